use crate::{core::viewport::Viewport, rendering::context::RenderContext, Result};

/// A drawable map layer. Layers only queue draw commands; painting is the
/// front end's business.
pub trait LayerTrait: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn layer_type(&self) -> LayerType;

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// In `0.0..=1.0`
    fn opacity(&self) -> f32;

    fn set_opacity(&mut self, opacity: f32);

    /// Higher values draw later (on top)
    fn z_index(&self) -> i32;

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()>;

    fn as_any(&self) -> &dyn std::any::Any;

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Vector,
}

impl LayerType {
    pub fn default_z_index(self) -> i32 {
        match self {
            LayerType::Tile => 0,
            LayerType::Vector => 10,
        }
    }
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LayerType::Tile => "tile",
            LayerType::Vector => "vector",
        })
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    /// Visible and opaque; tiles default below vectors
    pub fn new(id: impl Into<String>, name: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            layer_type,
            z_index: layer_type.default_z_index(),
            opacity: 1.0,
            visible: true,
        }
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }
}

/// Implements the property accessors of [`LayerTrait`] for a type with a
/// `properties: LayerProperties` field.
macro_rules! impl_layer_properties {
    () => {
        fn id(&self) -> &str {
            &self.properties.id
        }

        fn name(&self) -> &str {
            &self.properties.name
        }

        fn layer_type(&self) -> $crate::layers::base::LayerType {
            self.properties.layer_type
        }

        fn is_visible(&self) -> bool {
            self.properties.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.properties.visible = visible;
        }

        fn opacity(&self) -> f32 {
            self.properties.opacity
        }

        fn set_opacity(&mut self, opacity: f32) {
            self.properties.set_opacity(opacity);
        }

        fn z_index(&self) -> i32 {
            self.properties.z_index
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}

pub(crate) use impl_layer_properties;
