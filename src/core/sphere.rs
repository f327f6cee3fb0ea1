//! Geodesic measurements on the mean earth sphere.

use crate::{core::geo::LatLng, layers::vector::Geometry};
use geo::HaversineLength;
use geo_types::{Coord, LineString};

/// Great-circle length of a path through `coords`, in meters
pub fn line_length(coords: &[LatLng]) -> f64 {
    let line: LineString<f64> = coords.iter().map(|c| Coord::from(*c)).collect();
    line.haversine_length()
}

/// Length of a geometry in meters. Polygons measure their closed ring;
/// points have no length.
pub fn get_length(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Point(_) => 0.0,
        Geometry::LineString(coords) => line_length(coords),
        Geometry::Polygon(coords) => match (coords.first(), coords.last()) {
            (Some(first), Some(last)) if first != last => {
                line_length(coords) + line_length(&[*last, *first])
            }
            _ => line_length(coords),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_latitude() {
        let length = line_length(&[LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0)]);
        // 6_371_008.8 * pi / 180
        assert!((length - 111_195.08).abs() < 0.01, "got {length}");
    }

    #[test]
    fn test_degenerate_paths() {
        assert_eq!(line_length(&[]), 0.0);
        assert_eq!(line_length(&[LatLng::new(10.0, 10.0)]), 0.0);
        assert_eq!(get_length(&Geometry::Point(LatLng::new(1.0, 1.0))), 0.0);
    }

    #[test]
    fn test_length_matches_pairwise_distance() {
        let a = LatLng::new(-37.8136, 144.9631);
        let b = LatLng::new(-37.8200, 144.9700);
        let c = LatLng::new(-37.8300, 144.9500);
        let expected = a.distance_to(&b) + b.distance_to(&c);
        let length = get_length(&Geometry::LineString(vec![a, b, c]));
        assert!((length - expected).abs() < 1e-6);
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let ring = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
        ];
        let open = line_length(&ring);
        let closed = get_length(&Geometry::Polygon(ring));
        assert!(closed > open);
    }
}
