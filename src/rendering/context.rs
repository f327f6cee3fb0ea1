use crate::{
    core::geo::{Point, TileCoord},
    ui::overlay::{OverlayId, Positioning},
    Result,
};
use serde::{Deserialize, Serialize};

/// Toolkit-independent RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS-style `rgba()` with a fractional alpha
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8,
            ..self
        }
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

/// Styles for different rendering primitives
#[derive(Debug, Clone, PartialEq)]
pub struct PointRenderStyle {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRenderStyle {
    pub color: Color,
    pub width: f32,
    /// Alternating dash/gap lengths; empty for a solid line
    pub dash_pattern: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRenderStyle {
    pub fill_color: Color,
    pub stroke: LineRenderStyle,
}

/// Commands that can be issued to the render context.
/// Coordinates are container pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Tile {
        coord: TileCoord,
        url: String,
        bounds: (Point, Point),
        opacity: f32,
    },
    Point {
        position: Point,
        style: PointRenderStyle,
    },
    Line {
        points: Vec<Point>,
        style: LineRenderStyle,
    },
    Polygon {
        exterior: Vec<Point>,
        style: PolygonRenderStyle,
    },
    Overlay {
        id: OverlayId,
        text: String,
        class_name: String,
        anchor: Point,
        offset: [f32; 2],
        positioning: Positioning,
    },
}

/// Collects the draw commands of one frame; the UI layer paints them
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    drawing_queue: Vec<DrawCommand>,
}

impl RenderContext {
    /// Create a new render context
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    pub fn render_tile(
        &mut self,
        coord: TileCoord,
        url: String,
        bounds: (Point, Point),
        opacity: f32,
    ) -> Result<()> {
        if bounds.0.x >= bounds.1.x || bounds.0.y >= bounds.1.y {
            return Err(crate::Error::Layer(format!("invalid bounds for tile {coord:?}")).into());
        }

        if self.is_outside(bounds) {
            return Ok(());
        }

        self.drawing_queue.push(DrawCommand::Tile {
            coord,
            url,
            bounds,
            opacity: opacity.clamp(0.0, 1.0),
        });
        Ok(())
    }

    /// Render a point at the given position with the given style
    pub fn render_point(&mut self, position: &Point, style: &PointRenderStyle) {
        self.drawing_queue.push(DrawCommand::Point {
            position: *position,
            style: style.clone(),
        });
    }

    /// Render a line with the given points and style
    pub fn render_line(&mut self, points: &[Point], style: &LineRenderStyle) {
        if points.len() < 2 {
            return;
        }
        self.drawing_queue.push(DrawCommand::Line {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    /// Render a polygon ring
    pub fn render_polygon(&mut self, exterior: &[Point], style: &PolygonRenderStyle) {
        if exterior.len() < 3 {
            return;
        }
        self.drawing_queue.push(DrawCommand::Polygon {
            exterior: exterior.to_vec(),
            style: style.clone(),
        });
    }

    pub fn render_overlay(
        &mut self,
        id: OverlayId,
        text: &str,
        class_name: &str,
        anchor: Point,
        offset: [f32; 2],
        positioning: Positioning,
    ) {
        self.drawing_queue.push(DrawCommand::Overlay {
            id,
            text: text.to_string(),
            class_name: class_name.to_string(),
            anchor,
            offset,
            positioning,
        });
    }

    /// Get the current drawing queue
    pub fn drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    /// Clear the drawing queue
    pub fn clear_queue(&mut self) {
        self.drawing_queue.clear();
    }

    fn is_outside(&self, (min, max): (Point, Point)) -> bool {
        max.x < 0.0 || max.y < 0.0 || min.x > self.width as f64 || min.y > self.height as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_alpha() {
        assert_eq!(Color::rgba(0, 0, 0, 0.5).a, 128);
        assert_eq!(Color::rgba(255, 255, 255, 0.2).a, 51);
        assert_eq!(Color::WHITE.with_opacity(0.0).a, 0);
    }

    #[test]
    fn test_tiles_outside_are_culled() {
        let mut context = RenderContext::new(100, 100);
        let coord = TileCoord::new(0, 0, 0);

        context
            .render_tile(coord, "inside".into(), (Point::new(-10.0, -10.0), Point::new(50.0, 50.0)), 1.0)
            .unwrap();
        context
            .render_tile(coord, "outside".into(), (Point::new(200.0, 0.0), Point::new(300.0, 100.0)), 1.0)
            .unwrap();

        assert_eq!(context.drawing_queue().len(), 1);
        assert!(context
            .render_tile(coord, "bad".into(), (Point::new(5.0, 5.0), Point::new(5.0, 5.0)), 1.0)
            .is_err());
    }

    #[test]
    fn test_degenerate_lines_are_skipped() {
        let mut context = RenderContext::new(100, 100);
        let style = LineRenderStyle {
            color: Color::BLACK,
            width: 1.0,
            dash_pattern: vec![],
        };

        context.render_line(&[Point::new(1.0, 1.0)], &style);
        assert!(context.drawing_queue().is_empty());

        context.render_line(&[Point::new(1.0, 1.0), Point::new(2.0, 2.0)], &style);
        context.begin_frame();
        assert!(context.drawing_queue().is_empty());
    }
}
