use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, mpsc::UnboundedReceiver};

use crate::{
    display::coordinate_pair,
    error::{CompassError, Permission},
    geo::{
        GradientVector, heading_to_gradient_vector, opposite_heading, round_heading, to_cardinal,
    },
    location::{Fix, HeadingReading, LocationService},
    pin::Pin,
    pins::PinBook,
    storage::KeyValueStore,
};

/// Tells the UI something it displays has changed
pub trait StateUpdateSender: Send + Sync {
    fn send_update(&self);
}

#[derive(Debug, Clone, Copy, Default)]
struct Reading {
    heading: Option<f64>,
    fix: Option<Fix>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, specta::Type)]
/// Everything the compass screen needs to render
pub struct CompassUiState {
    /// Latest heading, `None` until the first heading event
    pub heading: Option<f64>,
    /// Rounded heading like `"153°"`, or a dash without a heading
    pub heading_label: String,
    pub cardinal: String,
    pub fix: Option<Fix>,
    /// Formatted coordinates, or a placeholder while locating
    pub coordinates_label: String,
    /// Gradient with its dark end pointing away from the heading
    pub gradient: GradientVector,
    pub pin_count: u32,
}

/// The compass screen, combines the live heading and position with the saved pins.
///
/// Gets position from a [LocationService], persists pins through a [PinBook] over `S`, and pings
/// the UI through [StateUpdateSender] whenever something visible changes.
pub struct Compass<L: LocationService, S: KeyValueStore, U: StateUpdateSender> {
    location: L,
    pins: PinBook<S>,
    reading: RwLock<Reading>,
    state_updates: U,
}

impl<L: LocationService, S: KeyValueStore, U: StateUpdateSender> Compass<L, S, U> {
    /// Set up the compass and load saved pins, pins are available even without a fix
    pub async fn new(location: L, store: S, state_updates: U) -> Self {
        Self {
            location,
            pins: PinBook::open(store).await,
            reading: RwLock::new(Reading::default()),
            state_updates,
        }
    }

    pub fn pin_book(&self) -> &PinBook<S> {
        &self.pins
    }

    /// Ask for location permission and take an initial fix
    pub async fn start(&self) -> Result<Fix, CompassError> {
        if !self.location.request_permission().await {
            warn!("Location permission denied");
            return Err(CompassError::PermissionDenied(Permission::Location));
        }
        self.refresh_fix().await
    }

    /// Take a new fix from the location service
    pub async fn refresh_fix(&self) -> Result<Fix, CompassError> {
        let fix = self
            .location
            .current_fix()
            .await
            .ok_or(CompassError::NoFixAvailable)?;
        self.reading.write().await.fix = Some(fix);
        self.state_updates.send_update();
        Ok(fix)
    }

    /// Handle an event from the heading stream
    pub async fn set_heading(&self, reading: HeadingReading) {
        if !reading.true_heading.is_finite() {
            return;
        }
        self.reading.write().await.heading = Some(reading.true_heading);
        self.state_updates.send_update();
    }

    /// Apply heading events in the order they were sent, returns once every sender is gone
    pub async fn follow_headings(&self, mut readings: UnboundedReceiver<HeadingReading>) {
        while let Some(reading) = readings.recv().await {
            self.set_heading(reading).await;
        }
    }

    pub async fn heading(&self) -> Option<f64> {
        self.reading.read().await.heading
    }

    pub async fn fix(&self) -> Option<Fix> {
        self.reading.read().await.fix
    }

    /// Save a pin at the current fix with the current heading
    pub async fn drop_pin(&self) -> Result<Pin, CompassError> {
        let Reading { heading, fix } = *self.reading.read().await;
        let fix = fix.ok_or(CompassError::NoFixAvailable)?;
        let res = self.pins.drop_pin(fix, heading).await;
        // The pin is in memory even if the write failed
        self.state_updates.send_update();
        if let Ok(pin) = &res {
            info!("Pin {} saved", pin.id);
        }
        res
    }

    /// Current coordinates for the clipboard, `None` without a fix
    pub async fn copy_text(&self) -> Option<String> {
        self.fix()
            .await
            .map(|fix| coordinate_pair(fix.latitude, fix.longitude))
    }

    /// Message for the share sheet, `None` without a fix
    pub async fn share_text(&self) -> Option<String> {
        let Reading { heading, fix } = *self.reading.read().await;
        let heading = heading.unwrap_or(0.0);
        fix.map(|fix| {
            format!(
                "I am here: {} ({} {}°)",
                coordinate_pair(fix.latitude, fix.longitude),
                to_cardinal(heading),
                round_heading(heading)
            )
        })
    }

    pub async fn ui_state(&self) -> CompassUiState {
        let Reading { heading, fix } = *self.reading.read().await;
        let shown = heading.unwrap_or(0.0);

        CompassUiState {
            heading,
            heading_label: heading
                .map(|h| format!("{}°", round_heading(h)))
                .unwrap_or_else(|| "—".to_string()),
            cardinal: to_cardinal(shown).to_string(),
            fix,
            coordinates_label: fix
                .map(|fix| coordinate_pair(fix.latitude, fix.longitude))
                .unwrap_or_else(|| "Locating…".to_string()),
            gradient: heading_to_gradient_vector(opposite_heading(shown)),
            pin_count: self.pins.len().await as u32,
        }
    }
}
