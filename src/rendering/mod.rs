pub mod context;

// Re-export main types
pub use context::{
    Color, DrawCommand, LineRenderStyle, PointRenderStyle, PolygonRenderStyle, RenderContext,
};
