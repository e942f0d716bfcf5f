use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all mile distances.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

pub const METERS_PER_MILE: f64 = 1609.344;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the WGS84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in miles
///
/// Inputs are not validated. Antipodal points and the antimeridian are not
/// special-cased.
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Check if a point is within the given radius of a center
pub fn is_within_radius(point: Coordinate, center: Coordinate, radius_miles: f64) -> bool {
    distance_miles(point, center) <= radius_miles
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

#[cfg(test)]
mod tests {
    use super::*;

    const PORT_ST_LUCIE: Coordinate = Coordinate {
        lat: 27.27327,
        lng: -80.342148,
    };

    #[test]
    fn test_known_distance_tenth_of_degree() {
        let west = Coordinate::new(27.27327, -80.442148);

        let distance = distance_miles(PORT_ST_LUCIE, west);
        // ~0.1 degree of longitude at this latitude
        assert!((distance - 6.1).abs() <= 0.2, "got {}", distance);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let points = [
            PORT_ST_LUCIE,
            Coordinate::new(27.235996, -80.427775),
            Coordinate::new(-6.2088, 106.8456),
            Coordinate::new(51.5074, -0.1278),
            Coordinate::new(-33.8688, 151.2093),
        ];

        for a in points {
            for b in points {
                assert!((distance_miles(a, b) - distance_miles(b, a)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for p in [PORT_ST_LUCIE, Coordinate::new(0.0, 0.0), Coordinate::new(90.0, 180.0)] {
            assert_eq!(distance_miles(p, p), 0.0);
        }
    }

    #[test]
    fn test_within_radius() {
        let nearby = Coordinate::new(27.28, -80.35);
        assert!(is_within_radius(nearby, PORT_ST_LUCIE, 10.0));

        let far = Coordinate::new(28.5383, -81.3792); // Orlando
        assert!(!is_within_radius(far, PORT_ST_LUCIE, 10.0));
    }

    #[test]
    fn test_unit_conversion() {
        assert!((meters_to_miles(500.0) - 0.31).abs() < 0.005);
        assert!((meters_to_miles(16_000.0) - 9.94).abs() < 0.005);
        assert!((miles_to_meters(1.0) - METERS_PER_MILE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(PORT_ST_LUCIE.is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
