use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, specta::Type)]
/// A single GPS reading
pub struct Fix {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, specta::Type)]
/// One event from the live heading stream, degrees clockwise from true north
pub struct HeadingReading {
    pub true_heading: f64,
}

pub trait LocationService: Send + Sync {
    /// Ask for foreground location permission, returns whether it was granted
    fn request_permission(&self) -> impl Future<Output = bool> + Send;
    /// Take a single fix, `None` if the device can't currently determine one
    fn current_fix(&self) -> impl Future<Output = Option<Fix>> + Send;
}
