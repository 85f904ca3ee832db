use serde::{Deserialize, Serialize};

/// Mean earth radius used for great-circle distances, in meters
const EARTH_RADIUS: f64 = 6_371_008.8;

/// A geographical coordinate in longitude/latitude order, the order the map
/// engine and every remote service in this crate use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    /// Creates a new coordinate
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Validates that the coordinates are finite and within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Calculates the distance to another coordinate using the Haversine formula
    pub fn distance_to(&self, other: &LngLat) -> f64 {
        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS * c
    }

    /// `[lng, lat]` pair as used by GeoJSON positions
    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<LngLat> for geo_types::Coord<f64> {
    fn from(value: LngLat) -> Self {
        geo_types::coord! { x: value.lng, y: value.lat }
    }
}

impl std::fmt::Display for LngLat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(LngLat::new(-122.4194, 37.7749).is_valid());
        assert!(!LngLat::new(-190.0, 0.0).is_valid());
        assert!(!LngLat::new(0.0, 91.0).is_valid());
        assert!(!LngLat::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_distance() {
        let ferry_building = LngLat::new(-122.3937, 37.7955);
        let coit_tower = LngLat::new(-122.4058, 37.8024);
        let d = ferry_building.distance_to(&coit_tower);
        assert!(d > 1_000.0 && d < 1_500.0, "unexpected distance {d}");
    }

    #[test]
    fn test_display_matches_directions_path_format() {
        assert_eq!(LngLat::new(-122.5, 37.75).to_string(), "-122.5,37.75");
    }
}
