//! Prelude module for common mapruler types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use mapruler::prelude::*;`

pub use crate::core::{
    config::{DrawConfig, MapConfig, TargetConfig, ViewConfig},
    geo::{LatLng, Point, TileCoord},
    map::{Dimension, Map, MapTarget},
    viewport::Viewport,
};

pub use crate::layers::{
    base::LayerTrait,
    manager::LayerManager,
    tile::{TileLayer, TileLayerOptions, TileSource},
    vector::{Feature, FeatureId, Geometry, VectorLayer, VectorSource, VectorStyle},
};

pub use crate::input::{
    events::{EventHandled, InputEvent, KeyCode, MouseButton},
    handler::{ListenerKey, Observable},
};

pub use crate::interactions::{
    base::{InteractionId, InteractionTrait},
    draw::{Draw, DrawEvent, DrawOptions, DrawType, GeometryChange},
    navigation::{DragPan, MouseWheelZoom},
};

pub use crate::measure::{
    format::{format_length, format_meters},
    session::{MeasureSession, SessionState},
    tooltip::TooltipState,
};

pub use crate::ui::overlay::{Overlay, OverlayElement, OverlayId, Positioning};

pub use crate::rendering::context::{DrawCommand, RenderContext};

pub use crate::component::MeasureMap;

#[cfg(feature = "egui")]
pub use crate::ui::widget::{MeasureMapWidget, UiMeasureMapExt};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
