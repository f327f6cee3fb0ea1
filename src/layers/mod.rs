pub mod base;
pub mod manager;
pub mod tile;
pub mod vector;

pub use base::{LayerProperties, LayerTrait, LayerType};
pub use manager::LayerManager;
pub use tile::{TileLayer, TileLayerOptions, TileSource, UrlTemplateSource};
pub use vector::{Feature, FeatureId, Geometry, VectorLayer, VectorSource, VectorStyle};
