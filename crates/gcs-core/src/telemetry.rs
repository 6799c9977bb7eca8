//! Wire-scaled telemetry decoding.
//!
//! Position reports arrive with fixed-point integer fields; these helpers
//! convert them to engineering units. Decoding never fails; downstream
//! consumers tolerate odd values by displaying a placeholder instead.

use serde::{Deserialize, Serialize};

use crate::models::LatLon;

/// Raw global-position report as it arrives from the vehicle link.
///
/// `lat`/`lon` are degrees x 1e7, altitudes are millimeters, velocity
/// components are cm/s, and `hdg` is centidegrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGlobalPosition {
    pub lat: i32,
    pub lon: i32,
    pub alt: i32,
    pub relative_alt: i32,
    pub vx: i16,
    pub vy: i16,
    pub vz: i16,
    pub hdg: u16,
}

impl RawGlobalPosition {
    /// Decoded position in degrees.
    pub fn position(&self) -> LatLon {
        LatLon::new(decode_coord(self.lat), decode_coord(self.lon))
    }
}

/// Fixed-point degrees x 1e7 to degrees.
pub fn decode_coord(raw: i32) -> f64 {
    raw as f64 / 1e7
}

/// Centidegrees to degrees in [0, 360). Raw values of 36000 and above wrap
/// around rather than propagating out of range.
pub fn decode_heading(raw: u16) -> f64 {
    (raw as f64 / 1e2).rem_euclid(360.0)
}

/// Horizontal ground speed from cm/s velocity components. The vertical
/// component is deliberately excluded from the scalar.
pub fn ground_speed_mps(vx: i16, vy: i16) -> f64 {
    (vx as f64).hypot(vy as f64) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_decodes_to_seven_decimal_degrees() {
        assert!((decode_coord(286_026_251) - 28.6026251).abs() < 1e-9);
        assert!((decode_coord(-811_999_887) - (-81.1999887)).abs() < 1e-9);
    }

    #[test]
    fn heading_decodes_centidegrees() {
        assert!((decode_heading(9_000) - 90.0).abs() < 1e-9);
        assert!((decode_heading(0) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn heading_wraps_into_range() {
        // 360.50 degrees raw wraps to 0.50
        assert!((decode_heading(36_050) - 0.5).abs() < 1e-9);
        assert!(decode_heading(u16::MAX) < 360.0);
    }

    #[test]
    fn ground_speed_is_horizontal_magnitude() {
        // 3-4-5 triangle in cm/s -> 5 m/s
        assert!((ground_speed_mps(300, 400) - 5.0).abs() < 1e-9);
        assert!((ground_speed_mps(0, 0)).abs() < 1e-9);
        assert!(ground_speed_mps(-300, 400) >= 0.0);
    }

    #[test]
    fn raw_position_round_trips_through_decode() {
        let raw = RawGlobalPosition {
            lat: 286_050_000,
            lon: -812_050_000,
            alt: 120_000,
            relative_alt: 50_000,
            vx: 100,
            vy: 0,
            vz: -10,
            hdg: 4_500,
        };
        let pos = raw.position();
        assert!((pos.lat - 28.605).abs() < 1e-9);
        assert!((pos.lon - (-81.205)).abs() < 1e-9);
    }
}
