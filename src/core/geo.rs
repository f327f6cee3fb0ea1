use geo::HaversineDistance;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

use crate::core::constants::MAX_LATITUDE;

/// A geographic coordinate in degrees (WGS84)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from a `[lon, lat]` pair, the order map configs use.
    pub fn from_lon_lat([lon, lat]: [f64; 2]) -> Self {
        Self::new(lat, lon)
    }

    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Finite and inside [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Great-circle distance in meters on the mean-radius sphere
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        geo_types::Point::from(*self).haversine_distance(&geo_types::Point::from(*other))
    }

    /// Clamps a latitude to the range Web Mercator can project
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }
}

impl From<LatLng> for geo_types::Coord<f64> {
    fn from(lat_lng: LatLng) -> Self {
        geo_types::coord! { x: lat_lng.lng, y: lat_lng.lat }
    }
}

impl From<LatLng> for geo_types::Point<f64> {
    fn from(lat_lng: LatLng) -> Self {
        geo_types::Point::new(lat_lng.lng, lat_lng.lat)
    }
}

/// A screen-space or world-pixel position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Slippy-map tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Whether `x` and `y` fall inside the `2^z` grid
    pub fn is_valid(&self) -> bool {
        let side = 1_u64 << self.z.min(63);
        (self.x as u64) < side && (self.y as u64) < side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lon_lat_order() {
        let melbourne = LatLng::from_lon_lat([144.9631, -37.8136]);
        assert_eq!(melbourne, LatLng::new(-37.8136, 144.9631));
        assert_eq!(melbourne.to_lon_lat(), [144.9631, -37.8136]);
        assert!(melbourne.is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
        assert!(!LatLng::new(0.0, 181.0).is_valid());
    }

    #[test]
    fn test_distance() {
        let nyc = LatLng::new(40.7128, -74.0060);
        let la = LatLng::new(34.0522, -118.2437);

        // Roughly 3936 km
        assert!((nyc.distance_to(&la) - 3_936_000.0).abs() < 10_000.0);
        assert_eq!(nyc.distance_to(&nyc), 0.0);
    }

    #[test]
    fn test_point_ops() {
        let a = Point::new(3.0, 4.0);
        assert_eq!(a + Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert_eq!(a - a, Point::default());
        assert_eq!(-(a * 2.0), Point::new(-6.0, -8.0));
        assert_eq!(a.distance_to(&Point::default()), 5.0);
    }

    #[test]
    fn test_tile_validity() {
        assert!(TileCoord::new(3, 3, 2).is_valid());
        assert!(!TileCoord::new(4, 0, 2).is_valid());
    }
}
