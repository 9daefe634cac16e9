use geo::{Distance, HaversineMeasure, Point};
use geogate_core::error::Result;
use geogate_core::models::Coordinate;
use std::f64::consts::PI;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const EARTH: HaversineMeasure = HaversineMeasure::new(EARTH_RADIUS_METERS);

/// Great-circle distance between two WGS84 coordinates in meters (haversine)
///
/// Fails with `InvalidCoordinate` when either input is non-finite or out of
/// range. The result is non-negative, exactly zero for identical inputs, and
/// bit-for-bit symmetric in its arguments.
pub fn distance_meters(a: &Coordinate, b: &Coordinate) -> Result<f64> {
    let a = a.validate()?;
    let b = b.validate()?;

    // Fixed operand order makes the result independent of argument order
    let (from, to) = if (a.latitude, a.longitude) <= (b.latitude, b.longitude) {
        (a, b)
    } else {
        (b, a)
    };

    let distance = EARTH.distance(
        Point::new(from.longitude, from.latitude),
        Point::new(to.longitude, to.latitude),
    );

    // Near antipodes rounding can push asin's argument past 1 (NaN); f64::min drops NaN
    Ok(distance.min(EARTH_RADIUS_METERS * PI))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Haversine;
    use geogate_core::GeogateError;
    use proptest::prelude::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude)
    }

    #[test]
    fn test_distance_accuracy() {
        // Paris to London is roughly 344km
        let paris = coord(48.8566, 2.3522);
        let london = coord(51.5074, -0.1276);

        let distance = distance_meters(&paris, &london).unwrap();
        assert!(
            distance > 339_000.0 && distance < 349_000.0,
            "Paris-London distance {} should be ~344km",
            distance
        );
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let distance = distance_meters(&coord(0.0, 0.0), &coord(1.0, 0.0)).unwrap();
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        assert!((distance - expected).abs() < 1e-6, "got {}", distance);
    }

    #[test]
    fn test_same_point_is_zero() {
        let ubud = coord(-8.5069, 115.2625);
        assert_eq!(distance_meters(&ubud, &ubud).unwrap(), 0.0);
    }

    #[test]
    fn test_antipodes() {
        let distance = distance_meters(&coord(0.0, 0.0), &coord(0.0, 180.0)).unwrap();
        let half_circumference = EARTH_RADIUS_METERS * std::f64::consts::PI;
        assert!((distance - half_circumference).abs() < 1e-3);

        let distance = distance_meters(&coord(-33.8688, 151.2093), &coord(33.8688, -28.7907)).unwrap();
        assert!(distance.is_finite());
        assert!(distance <= half_circumference);
    }

    #[test]
    fn test_uses_configured_earth_radius() {
        let a = coord(-8.6705, 115.2126);
        let b = coord(40.7128, -74.0060);
        let expected = HaversineMeasure::new(EARTH_RADIUS_METERS)
            .distance(Point::new(a.longitude, a.latitude), Point::new(b.longitude, b.latitude));
        assert_eq!(distance_meters(&a, &b).unwrap(), expected);
    }

    #[test]
    fn test_range_rejection() {
        let err = distance_meters(&coord(91.0, 0.0), &coord(0.0, 0.0)).unwrap_err();
        assert!(matches!(err, GeogateError::InvalidCoordinate { latitude, .. } if latitude == 91.0));

        assert!(distance_meters(&coord(0.0, 0.0), &coord(0.0, 181.0)).is_err());
    }

    #[test]
    fn test_non_finite_is_an_error_not_infinity() {
        let result = distance_meters(&coord(f64::NAN, 0.0), &coord(0.0, 0.0));
        assert!(matches!(result, Err(GeogateError::InvalidCoordinate { .. })));

        let result = distance_meters(&coord(0.0, 0.0), &coord(0.0, f64::NEG_INFINITY));
        assert!(matches!(result, Err(GeogateError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_close_to_grs80_haversine() {
        // geo's default Haversine uses the GRS80 mean radius (6371008.8 m)
        let pairs = [
            (coord(-8.6705, 115.2126), coord(-8.5069, 115.2625)),
            (coord(40.7128, -74.0060), coord(34.0522, -118.2437)),
            (coord(-33.8688, 151.2093), coord(35.6762, 139.6503)),
        ];

        for (a, b) in pairs {
            let ours = distance_meters(&a, &b).unwrap();
            let theirs = Haversine.distance(
                Point::new(a.longitude, a.latitude),
                Point::new(b.longitude, b.latitude),
            );
            let relative = (ours - theirs).abs() / theirs;
            assert!(relative < 1e-5, "ours {} vs geo {}", ours, theirs);
        }
    }

    fn valid_coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0..=90.0f64, -180.0..=180.0f64).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in valid_coordinate(), b in valid_coordinate()) {
            prop_assert_eq!(distance_meters(&a, &b).unwrap(), distance_meters(&b, &a).unwrap());
        }

        #[test]
        fn prop_zero_for_identical(a in valid_coordinate()) {
            prop_assert_eq!(distance_meters(&a, &a).unwrap(), 0.0);
        }

        #[test]
        fn prop_bounded(a in valid_coordinate(), b in valid_coordinate()) {
            let d = distance_meters(&a, &b).unwrap();
            prop_assert!(d >= 0.0);
            prop_assert!(d <= EARTH_RADIUS_METERS * std::f64::consts::PI + 1e-6);
        }
    }
}
