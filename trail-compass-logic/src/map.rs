use serde::{Deserialize, Serialize};

use crate::location::Fix;

/// Span of the region shown when centering on the user
const DEFAULT_DELTA: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, specta::Type)]
pub enum MapType {
    #[default]
    Standard,
    Satellite,
}

impl MapType {
    pub fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Satellite,
            Self::Satellite => Self::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
/// The camera of the map, centre plus the span in degrees
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, specta::Type)]
/// State backing the map screen, drawing the map itself is left to the frontend
pub struct MapState {
    /// Where the user was last seen
    pub me: Option<Fix>,
    /// `None` until the first fix, the screen shows a loading indicator until then
    pub region: Option<MapRegion>,
    pub map_type: MapType,
}

impl MapState {
    /// Record a fresh fix and move the camera onto it
    pub fn center_on(&mut self, fix: Fix) {
        self.me = Some(fix);
        self.region = Some(MapRegion {
            latitude: fix.latitude,
            longitude: fix.longitude,
            latitude_delta: DEFAULT_DELTA,
            longitude_delta: DEFAULT_DELTA,
        });
    }

    pub fn toggle_map_type(&mut self) -> MapType {
        self.map_type = self.map_type.toggled();
        self.map_type
    }

    /// Label for the floating location badge
    pub fn badge_text(&self) -> String {
        match self.me {
            Some(me) => format!("You: {:.4}, {:.4}", me.latitude, me.longitude),
            None => "No location".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut state = MapState::default();
        assert_eq!(state.map_type, MapType::Standard);
        assert_eq!(state.toggle_map_type(), MapType::Satellite);
        assert_eq!(state.toggle_map_type(), MapType::Standard);
    }

    #[test]
    fn test_center() {
        let mut state = MapState::default();
        assert_eq!(state.region, None);
        assert_eq!(state.badge_text(), "No location");

        state.center_on(Fix {
            latitude: 37.77493,
            longitude: -122.41942,
        });

        let region = state.region.expect("No region");
        assert_eq!(region.latitude, 37.77493);
        assert_eq!(region.latitude_delta, DEFAULT_DELTA);
        assert_eq!(state.badge_text(), "You: 37.7749, -122.4194");
    }
}
