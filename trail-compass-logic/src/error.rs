use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, specta::Type)]
/// A platform permission the app asks for
pub enum Permission {
    Location,
    Notifications,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Everything that can go wrong while using the compass, none of it is fatal
pub enum CompassError {
    /// The pin blob couldn't be read
    StorageReadFailure,
    /// The pin blob couldn't be written, in-memory pins are kept regardless
    StorageWriteFailure,
    /// The user denied a permission
    PermissionDenied(Permission),
    /// No GPS fix has been received yet
    NoFixAvailable,
}

impl CompassError {
    /// Short message to show the user in a transient snackbar
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::StorageReadFailure => "Couldn't load saved pins",
            Self::StorageWriteFailure => "Failed to save pins",
            Self::PermissionDenied(Permission::Location) => "Location permission denied",
            Self::PermissionDenied(Permission::Notifications) => "Notification permission denied",
            Self::NoFixAvailable => "No GPS fix yet",
        }
    }
}

impl fmt::Display for CompassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

impl std::error::Error for CompassError {}

impl From<CompassError> for String {
    fn from(err: CompassError) -> Self {
        err.to_string()
    }
}
