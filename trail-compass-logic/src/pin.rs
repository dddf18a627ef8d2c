use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{UtcDT, geo::now_iso, location::Fix};

pub type PinId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, specta::Type)]
/// A saved waypoint, never mutated after creation
pub struct Pin {
    /// Unique within a collection, Unix milliseconds at creation
    pub id: PinId,
    pub lat: f64,
    pub lon: f64,
    /// Heading at capture time in degrees, 0 if it wasn't known
    pub heading: f64,
    /// ISO-8601 creation time
    pub ts: String,
}

impl Pin {
    /// Create a pin at `fix` with an id that doesn't collide with anything in `existing`
    pub fn new(fix: Fix, heading: Option<f64>, existing: &[Pin]) -> Self {
        Self {
            id: next_pin_id(existing, Utc::now().timestamp_millis()),
            lat: fix.latitude,
            lon: fix.longitude,
            heading: heading.filter(|h| h.is_finite()).unwrap_or(0.0),
            ts: now_iso(),
        }
    }

    /// Parse the creation time, `None` if it was stored in some other format
    pub fn timestamp(&self) -> Option<UtcDT> {
        DateTime::parse_from_rfc3339(&self.ts)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Pick an id based on the current time, bumped past any id that's already taken
fn next_pin_id(existing: &[Pin], now_millis: i64) -> PinId {
    let newest = existing
        .iter()
        .filter_map(|p| p.id.parse::<i64>().ok())
        .max();

    // A stored id at i64::MAX can't be bumped, start from the clock instead
    let start = match newest {
        Some(newest) if newest >= now_millis => newest.checked_add(1).unwrap_or(now_millis),
        _ => now_millis,
    };

    (start..=i64::MAX)
        .chain(i64::MIN..start)
        .find(|candidate| !existing.iter().any(|p| p.id == candidate.to_string()))
        .unwrap_or(start)
        .to_string()
}

/// New collection with `pin` first
pub fn prepend_pin(pins: &[Pin], pin: Pin) -> Vec<Pin> {
    std::iter::once(pin).chain(pins.iter().cloned()).collect()
}

/// New collection without the pin with the given id, unchanged if there is none
pub fn remove_pin(pins: &[Pin], id: &str) -> Vec<Pin> {
    pins.iter().filter(|p| p.id != id).cloned().collect()
}
