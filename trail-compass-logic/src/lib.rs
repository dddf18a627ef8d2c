mod compass;
mod display;
mod error;
mod geo;
mod location;
mod map;
mod notification;
mod pin;
mod pins;
mod storage;
#[cfg(test)]
mod tests;

pub use compass::{Compass, CompassUiState, StateUpdateSender};
pub use display::{PinListItem, coordinate_pair, pin_share_text};
pub use error::{CompassError, Permission};
pub use geo::{
    GradientVector, Point2D, format_coordinate, heading_to_gradient_vector, normalize_heading,
    now_iso, opposite_heading, round_heading, to_cardinal,
};
pub use location::{Fix, HeadingReading, LocationService};
pub use map::{MapRegion, MapState, MapType};
pub use notification::{
    NotificationBehavior, PushRegistrar, ensure_notification_permission,
    install_notification_handler, notification_behavior, register_for_push_notifications,
};
pub use pin::{Pin, PinId, prepend_pin, remove_pin};
pub use pins::PinBook;
pub use storage::{KeyValueStore, PINS_KEY, PinStore};

/// Convenience alias for UTC DT
pub type UtcDT = chrono::DateTime<chrono::Utc>;

pub mod prelude {
    use anyhow::Error as AnyhowError;
    use std::result::Result as StdResult;
    pub type Result<T = (), E = AnyhowError> = StdResult<T, E>;
    pub use anyhow::Context;
}
