use log::{error, warn};
use tauri::{AppHandle, plugin::PermissionState};
use tauri_plugin_geolocation::{GeolocationExt, PermissionType, PositionOptions, WatchEvent};
use trail_compass_logic::{Fix, HeadingReading, LocationService};

#[derive(Clone)]
pub struct TauriLocation(AppHandle);

impl TauriLocation {
    pub fn new(app: AppHandle) -> Self {
        Self(app)
    }

    /// Subscribe to heading changes, returns the watch id to pass to [Self::clear_watch]
    pub fn watch_heading(
        &self,
        on_heading: impl Fn(HeadingReading) + Send + Sync + 'static,
    ) -> Option<u32> {
        let res = self
            .0
            .geolocation()
            .watch_position(OPTIONS, move |event| match event {
                WatchEvent::Position(pos) => {
                    // Devices only report a heading while they can determine one
                    if let Some(true_heading) = pos.coords.heading {
                        on_heading(HeadingReading { true_heading });
                    }
                }
                WatchEvent::Error(why) => {
                    warn!("Heading watch error: {why}");
                }
            });

        match res {
            Ok(id) => Some(id),
            Err(why) => {
                error!("Failed to watch heading: {why:?}");
                None
            }
        }
    }

    pub fn clear_watch(&self, id: u32) {
        if let Err(why) = self.0.geolocation().clear_watch(id) {
            warn!("Failed to clear heading watch {id}: {why:?}");
        }
    }
}

const OPTIONS: PositionOptions = PositionOptions {
    enable_high_accuracy: true,
    timeout: 10000,
    maximum_age: 2000,
};

fn is_granted(state: PermissionState) -> bool {
    matches!(state, PermissionState::Granted)
}

impl LocationService for TauriLocation {
    async fn request_permission(&self) -> bool {
        let geolocation = self.0.geolocation();

        match geolocation.check_permissions() {
            Ok(status) if is_granted(status.location) => return true,
            Ok(_) => {}
            Err(why) => warn!("Failed to check location permission: {why:?}"),
        }

        match geolocation.request_permissions(Some(vec![PermissionType::Location])) {
            Ok(status) => is_granted(status.location),
            Err(why) => {
                warn!("Failed to request location permission: {why:?}");
                false
            }
        }
    }

    async fn current_fix(&self) -> Option<Fix> {
        match self.0.geolocation().get_current_position(Some(OPTIONS)) {
            Ok(pos) => Some(Fix {
                latitude: pos.coords.latitude,
                longitude: pos.coords.longitude,
            }),
            Err(why) => {
                warn!("Failed to get fix: {why:?}");
                None
            }
        }
    }
}
