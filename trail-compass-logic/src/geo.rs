use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Labels for the 8 compass points, clockwise from north
const CARDINALS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Width of a single cardinal sector in degrees
const SECTOR_DEGREES: f64 = 360.0 / CARDINALS.len() as f64;

/// Number of fractional digits shown for coordinates
const COORDINATE_DIGITS: usize = 5;

/// How far from the centre the gradient endpoints sit, in unit-square coordinates
const GRADIENT_SCALE: f64 = 0.45;

const GRADIENT_CENTER: Point2D = Point2D { x: 0.5, y: 0.5 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
/// A point in the unit square, (0, 0) is the top left
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, specta::Type)]
/// Start and end points for a linear gradient pointing along a heading
pub struct GradientVector {
    pub start: Point2D,
    pub end: Point2D,
}

/// Bring any heading into `[0, 360)`, non-finite values become 0
pub fn normalize_heading(heading: f64) -> f64 {
    if !heading.is_finite() {
        return 0.0;
    }
    let norm = heading.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if norm >= 360.0 { 0.0 } else { norm }
}

/// Whole degrees for display, `153.6` becomes `154`
pub fn round_heading(heading: f64) -> i64 {
    normalize_heading(heading).round() as i64 % 360
}

/// The heading pointing the other way
pub fn opposite_heading(heading: f64) -> f64 {
    normalize_heading(normalize_heading(heading) + 180.0)
}

/// Nearest 8-point compass label for a heading in degrees
pub fn to_cardinal(heading: f64) -> &'static str {
    let sector = (normalize_heading(heading) / SECTOR_DEGREES).round() as usize;
    CARDINALS[sector % CARDINALS.len()]
}

/// Render a single coordinate component for display
pub fn format_coordinate(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.COORDINATE_DIGITS$}")
}

static LAST_ISO_MILLIS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Current UTC instant as an ISO-8601 string with millisecond precision.
///
/// Never goes backwards within a process, even if the system clock does.
pub fn now_iso() -> String {
    let now = Utc::now();
    let prev = LAST_ISO_MILLIS.fetch_max(now.timestamp_millis(), Ordering::Relaxed);
    let dt = if prev > now.timestamp_millis() {
        DateTime::<Utc>::from_timestamp_millis(prev).unwrap_or(now)
    } else {
        now
    };
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Compute gradient endpoints for a heading (0° = up, clockwise positive).
///
/// The end point lies along the heading, the start point mirrors it through the centre. Both are
/// clamped into the unit square. Callers wanting the gradient to face away from the heading should
/// pass [opposite_heading].
pub fn heading_to_gradient_vector(heading: f64) -> GradientVector {
    let rad = normalize_heading(heading).to_radians();
    let (vx, vy) = (rad.sin(), -rad.cos());

    let start = Point2D {
        x: GRADIENT_CENTER.x - GRADIENT_SCALE * vx,
        y: GRADIENT_CENTER.y - GRADIENT_SCALE * vy,
    };
    let end = Point2D {
        x: GRADIENT_CENTER.x + GRADIENT_SCALE * vx,
        y: GRADIENT_CENTER.y + GRADIENT_SCALE * vy,
    };

    GradientVector {
        start: start.clamped(),
        end: end.clamped(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: Point2D, b: Point2D) {
        assert!(
            (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON,
            "{a:?} != {b:?}"
        );
    }

    fn reflect(p: Point2D) -> Point2D {
        Point2D {
            x: 2.0 * GRADIENT_CENTER.x - p.x,
            y: 2.0 * GRADIENT_CENTER.y - p.y,
        }
    }

    #[test]
    fn test_cardinal_labels() {
        assert_eq!(to_cardinal(0.0), "N");
        assert_eq!(to_cardinal(22.0), "N");
        assert_eq!(to_cardinal(23.0), "NE");
        assert_eq!(to_cardinal(45.0), "NE");
        assert_eq!(to_cardinal(90.0), "E");
        assert_eq!(to_cardinal(153.2), "SE");
        assert_eq!(to_cardinal(180.0), "S");
        assert_eq!(to_cardinal(225.0), "SW");
        assert_eq!(to_cardinal(270.0), "W");
        assert_eq!(to_cardinal(315.0), "NW");
        assert_eq!(to_cardinal(359.0), "N");
    }

    #[test]
    fn test_cardinal_wraps() {
        for h in 0..360 {
            let h = h as f64;
            let label = to_cardinal(h);
            assert!(CARDINALS.contains(&label), "Unknown label {label}");
            assert_eq!(label, to_cardinal(h + 360.0), "Heading {h} doesn't wrap");
        }
    }

    #[test]
    fn test_cardinal_negative() {
        assert_eq!(to_cardinal(-10.0), to_cardinal(350.0));
        assert_eq!(to_cardinal(-90.0), "W");
        assert_eq!(to_cardinal(-720.0), "N");
    }

    #[test]
    fn test_cardinal_non_finite() {
        assert_eq!(to_cardinal(f64::NAN), "N");
        assert_eq!(to_cardinal(f64::INFINITY), "N");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_heading(370.0), 10.0);
        assert_eq!(normalize_heading(-10.0), 350.0);
        assert_eq!(normalize_heading(360.0), 0.0);
        let tiny = normalize_heading(-1e-20);
        assert!((0.0..360.0).contains(&tiny));
    }

    #[test]
    fn test_round_heading() {
        assert_eq!(round_heading(153.2), 153);
        assert_eq!(round_heading(153.6), 154);
        assert_eq!(round_heading(359.7), 0);
        assert_eq!(round_heading(-1.0), 359);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(opposite_heading(0.0), 180.0);
        assert_eq!(opposite_heading(270.0), 90.0);
        assert_eq!(opposite_heading(-90.0), 90.0);
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(37.7749), "37.77490");
        assert_eq!(format_coordinate(-122.4194), "-122.41940");
        assert_eq!(format_coordinate(0.0), "0.00000");
        assert_eq!(format_coordinate(f64::NAN), "0.00000");
    }

    #[test]
    fn test_gradient_north() {
        let grad = heading_to_gradient_vector(0.0);
        assert_close(grad.start, Point2D { x: 0.5, y: 0.95 });
        assert_close(grad.end, Point2D { x: 0.5, y: 0.05 });
    }

    #[test]
    fn test_gradient_reflection() {
        let north = heading_to_gradient_vector(0.0);
        let south = heading_to_gradient_vector(180.0);
        assert_close(north.start, reflect(south.start));
        assert_close(north.end, reflect(south.end));
        assert_close(north.start, south.end);
    }

    #[test]
    fn test_gradient_clamped() {
        for h in (0..720).map(|h| h as f64 * 0.5 - 180.0) {
            let grad = heading_to_gradient_vector(h);
            for p in [grad.start, grad.end] {
                assert!((0.0..=1.0).contains(&p.x), "x out of range for {h}");
                assert!((0.0..=1.0).contains(&p.y), "y out of range for {h}");
            }
        }
    }

    #[test]
    fn test_now_iso_format() {
        let ts = now_iso();
        assert_eq!(ts.len(), "2024-05-29T12:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_now_iso_non_decreasing() {
        let mut prev = now_iso();
        for _ in 0..100 {
            let next = now_iso();
            assert!(next >= prev, "{next} came before {prev}");
            prev = next;
        }
    }
}
