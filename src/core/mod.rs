pub mod config;
pub mod constants;
pub mod geo;
pub mod map;
pub mod sphere;
pub mod viewport;

pub use config::MapConfig;
pub use geo::{LatLng, Point, TileCoord};
pub use map::{Dimension, Map, MapTarget};
pub use viewport::Viewport;
