use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::{
    geo::{format_coordinate, round_heading},
    pin::{Pin, PinId},
};

/// `"lat, lon"` as shown on screen and copied to the clipboard
pub fn coordinate_pair(lat: f64, lon: f64) -> String {
    format!("{}, {}", format_coordinate(lat), format_coordinate(lon))
}

/// Message handed to the share sheet for a saved pin
pub fn pin_share_text(pin: &Pin) -> String {
    format!(
        "Pin: {} • heading {}°",
        coordinate_pair(pin.lat, pin.lon),
        round_heading(pin.heading)
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, specta::Type)]
/// A row on the saved pins screen
pub struct PinListItem {
    pub id: PinId,
    /// Coordinates of the pin
    pub title: String,
    /// Local creation time and heading
    pub description: String,
}

impl From<&Pin> for PinListItem {
    fn from(pin: &Pin) -> Self {
        let when = pin
            .timestamp()
            .map(|dt| {
                dt.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| pin.ts.clone());

        Self {
            id: pin.id.clone(),
            title: coordinate_pair(pin.lat, pin.lon),
            description: format!("{when} • {}°", round_heading(pin.heading)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_pin(ts: &str) -> Pin {
        Pin {
            id: "1".to_string(),
            lat: 37.7749,
            lon: -122.4194,
            heading: 153.6,
            ts: ts.to_string(),
        }
    }

    #[test]
    fn test_coordinate_pair() {
        assert_eq!(coordinate_pair(37.7749, -122.4194), "37.77490, -122.41940");
    }

    #[test]
    fn test_share_text() {
        let pin = mk_pin("2024-05-29T12:00:00.000Z");
        assert_eq!(
            pin_share_text(&pin),
            "Pin: 37.77490, -122.41940 • heading 154°"
        );
    }

    #[test]
    fn test_list_item() {
        let item = PinListItem::from(&mk_pin("2024-05-29T12:00:00.000Z"));
        assert_eq!(item.id, "1");
        assert_eq!(item.title, "37.77490, -122.41940");
        assert!(item.description.ends_with(" • 154°"));
    }

    #[test]
    fn test_list_item_bad_timestamp() {
        let item = PinListItem::from(&mk_pin("yesterday"));
        assert_eq!(item.description, "yesterday • 154°");
    }
}
