use crate::core::constants::{MAX_LATITUDE, MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, Point, TileCoord};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A tile that intersects the viewport, with its screen rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleTile {
    pub coord: TileCoord,
    /// Min/max container pixel corners
    pub bounds: (Point, Point),
}

/// The camera: what part of the world a container of `size` pixels shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Container size in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center: Self::clamp_center(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Narrows the zoom range, re-clamping the current zoom
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE as f64 * self.zoom.exp2()
    }

    /// Web Mercator world pixel of `lat_lng` at the current zoom
    fn to_world(&self, lat_lng: &LatLng) -> Point {
        let world_size = self.world_size();
        let sin_lat = LatLng::clamp_lat(lat_lng.lat).to_radians().sin();

        Point::new(
            (lat_lng.lng + 180.0) / 360.0 * world_size,
            (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * world_size,
        )
    }

    fn from_world(&self, world: &Point) -> LatLng {
        let world_size = self.world_size();
        let lat = (PI * (1.0 - 2.0 * world.y / world_size)).sinh().atan().to_degrees();
        LatLng::new(lat, world.x / world_size * 360.0 - 180.0)
    }

    fn top_left_world(&self) -> Point {
        self.to_world(&self.center) - self.size * 0.5
    }

    /// Container pixel of a coordinate
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        self.to_world(lat_lng) - self.top_left_world()
    }

    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        self.from_world(&(*pixel + self.top_left_world()))
    }

    /// Moves the content by `delta` pixels, as a drag does
    pub fn pan(&mut self, delta: Point) {
        let center = self.from_world(&(self.to_world(&self.center) - delta));
        self.center = Self::clamp_center(center);
    }

    /// Zooms within the limits. With a focus point, the coordinate under it
    /// stays under it.
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        let Some(focus) = focus_point else {
            self.zoom = new_zoom;
            return;
        };
        let anchored = self.pixel_to_lat_lng(&focus);
        self.zoom = new_zoom;
        let drift = self.lat_lng_to_pixel(&anchored) - focus;
        self.pan(-drift);
    }

    /// Integer zoom level the base tiles are requested at
    pub fn tile_zoom(&self, max_tile_zoom: u8) -> u8 {
        self.zoom.round().clamp(0.0, max_tile_zoom as f64) as u8
    }

    /// Lists the tiles covering the container at `tile_zoom`
    pub fn visible_tiles(&self, tile_zoom: u8) -> Vec<VisibleTile> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return Vec::new();
        }

        let tile_px = TILE_SIZE as f64 * (self.zoom - tile_zoom as f64).exp2();
        let max_index = 2_i64.pow(tile_zoom as u32) - 1;
        let top_left = self.top_left_world();

        let x_min = ((top_left.x / tile_px).floor() as i64).clamp(0, max_index);
        let x_max = (((top_left.x + self.size.x) / tile_px).floor() as i64).clamp(0, max_index);
        let y_min = ((top_left.y / tile_px).floor() as i64).clamp(0, max_index);
        let y_max = (((top_left.y + self.size.y) / tile_px).floor() as i64).clamp(0, max_index);

        let mut tiles = Vec::new();
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let min = Point::new(x as f64 * tile_px - top_left.x, y as f64 * tile_px - top_left.y);
                let max = Point::new(min.x + tile_px, min.y + tile_px);
                tiles.push(VisibleTile {
                    coord: TileCoord::new(x as u32, y as u32, tile_zoom),
                    bounds: (min, max),
                });
            }
        }
        tiles
    }

    fn clamp_center(center: LatLng) -> LatLng {
        LatLng::new(
            center.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
            center.lng.clamp(-180.0, 180.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_inputs() {
        let viewport = Viewport::new(LatLng::new(89.9, 200.0), 25.0, Point::new(800.0, 500.0));

        assert_eq!(viewport.zoom, MAX_ZOOM);
        assert_eq!(viewport.center.lat, MAX_LATITUDE);
        assert_eq!(viewport.center.lng, 180.0);
    }

    #[test]
    fn test_center_maps_to_container_middle() {
        let viewport = Viewport::new(LatLng::new(-37.8136, 144.9631), 10.0, Point::new(800.0, 500.0));

        let pixel = viewport.lat_lng_to_pixel(&viewport.center);
        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 250.0).abs() < 1e-6);
    }

    #[test]
    fn test_coordinate_round_trip() {
        let viewport = Viewport::new(LatLng::new(-37.8136, 144.9631), 12.0, Point::new(800.0, 500.0));

        let pixel = Point::new(123.0, 456.0);
        let back = viewport.lat_lng_to_pixel(&viewport.pixel_to_lat_lng(&pixel));
        assert!((back.x - pixel.x).abs() < 1e-6);
        assert!((back.y - pixel.y).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_respects_limits() {
        let mut viewport = Viewport::new(LatLng::default(), 16.0, Point::new(256.0, 256.0));
        viewport.set_zoom_limits(3.0, 12.0);
        assert_eq!(viewport.zoom, 12.0);

        viewport.zoom_to(1.0, None);
        assert_eq!(viewport.zoom, 3.0);
        viewport.zoom_to(30.0, Some(Point::new(10.0, 10.0)));
        assert_eq!(viewport.zoom, 12.0);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 3.0, Point::new(512.0, 512.0));

        viewport.pan(Point::new(10.0, 0.0));
        // Dragging content to the right reveals what lies to the west
        assert!(viewport.center.lng < 0.0);
    }

    #[test]
    fn test_zoom_keeps_focus_point_fixed() {
        let mut viewport = Viewport::new(LatLng::new(-37.8, 144.9), 10.0, Point::new(800.0, 500.0));
        let focus = Point::new(100.0, 100.0);
        let under_focus = viewport.pixel_to_lat_lng(&focus);

        viewport.zoom_to(11.0, Some(focus));

        let after = viewport.lat_lng_to_pixel(&under_focus);
        assert_eq!(viewport.zoom, 11.0);
        assert!((after.x - focus.x).abs() < 1e-3);
        assert!((after.y - focus.y).abs() < 1e-3);
    }

    #[test]
    fn test_visible_tiles_cover_container() {
        let viewport = Viewport::new(LatLng::new(-37.8136, 144.9631), 10.0, Point::new(800.0, 500.0));
        let tiles = viewport.visible_tiles(10);

        assert!(!tiles.is_empty());
        let min_x = tiles.iter().map(|t| t.bounds.0.x).fold(f64::INFINITY, f64::min);
        let max_x = tiles.iter().map(|t| t.bounds.1.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = tiles.iter().map(|t| t.bounds.0.y).fold(f64::INFINITY, f64::min);
        let max_y = tiles.iter().map(|t| t.bounds.1.y).fold(f64::NEG_INFINITY, f64::max);
        assert!(min_x <= 0.0 && max_x >= 800.0);
        assert!(min_y <= 0.0 && max_y >= 500.0);
        assert!(tiles.iter().all(|t| t.coord.z == 10 && t.coord.is_valid()));
    }

    #[test]
    fn test_visible_tiles_empty_for_zero_size() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 2.0, Point::new(0.0, 0.0));
        assert!(viewport.visible_tiles(2).is_empty());
    }
}
