//! # mapruler
//!
//! An interactive map with a line measuring tool.
//!
//! A [`MeasureMap`] mounts a map (OpenStreetMap base tiles and a vector
//! layer) into a container target. The user draws lines on it; while a
//! line is being drawn a tooltip follows its last vertex showing the
//! geodesic length, and once the line is finished the tooltip stays on
//! the map as a static annotation.
//!
//! The crate is UI-toolkit agnostic: input arrives as [`InputEvent`]s and
//! each frame is produced as a queue of draw commands in a
//! [`RenderContext`]. With the `egui` feature,
//! [`ui::widget::MeasureMapWidget`] wires both ends into an egui `Ui`.

pub mod component;
pub mod core;
pub mod input;
pub mod interactions;
pub mod layers;
pub mod measure;
pub mod prelude;
pub mod rendering;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use component::MeasureMap;

pub use core::{
    config::MapConfig,
    geo::{LatLng, Point, TileCoord},
    map::{Dimension, Map, MapTarget},
    viewport::Viewport,
};

pub use layers::{
    base::LayerTrait,
    tile::TileLayer,
    vector::{Feature, Geometry, VectorLayer, VectorSource},
};

pub use input::{events::InputEvent, handler::ListenerKey};

pub use interactions::{base::InteractionTrait, draw::Draw};

pub use measure::{format::format_length, session::MeasureSession};

pub use rendering::context::RenderContext;

pub use ui::overlay::Overlay;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Interaction error: {0}")]
    Interaction(String),

    #[error("Overlay error: {0}")]
    Overlay(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs an `env_logger` logger (filter from `RUST_LOG`, defaulting to
/// `mapruler=debug`). Returns `false` if a logger was already installed.
#[cfg(feature = "debug")]
pub fn init_debug_logging() -> bool {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("mapruler=debug"))
        .try_init()
        .is_ok()
}
