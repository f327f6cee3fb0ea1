use crate::{
    core::{
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    layers::base::{impl_layer_properties, LayerProperties, LayerTrait, LayerType},
    rendering::context::{Color, LineRenderStyle, PointRenderStyle, PolygonRenderStyle, RenderContext},
    Result,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

static NEXT_FEATURE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a vector feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(u64);

impl FeatureId {
    pub fn next() -> Self {
        Self(NEXT_FEATURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Drawable geometry kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(LatLng),
    LineString(Vec<LatLng>),
    /// Single exterior ring, not explicitly closed
    Polygon(Vec<LatLng>),
}

impl Geometry {
    pub fn coordinates(&self) -> &[LatLng] {
        match self {
            Geometry::Point(coord) => std::slice::from_ref(coord),
            Geometry::LineString(coords) | Geometry::Polygon(coords) => coords,
        }
    }

    pub fn last_coordinate(&self) -> Option<LatLng> {
        self.coordinates().last().copied()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
        }
    }
}

/// A geometry with an identity
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: FeatureId::next(),
            geometry,
        }
    }
}

/// Shared feature store. Clones share the same features, so a draw
/// interaction and the layer displaying its output can hold one each.
#[derive(Debug, Clone, Default)]
pub struct VectorSource {
    features: Arc<Mutex<Vec<Feature>>>,
}

impl VectorSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Feature>> {
        self.features.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_feature(&self, feature: Feature) {
        self.lock().push(feature);
    }

    pub fn feature(&self, id: FeatureId) -> Option<Feature> {
        self.lock().iter().find(|f| f.id == id).cloned()
    }

    /// Snapshot of the stored features, in insertion order
    pub fn features(&self) -> Vec<Feature> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Appearance of vector features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStyle {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub line_dash: Vec<f32>,
    /// Circle drawn for point geometries and the drawing cursor
    pub point_radius: f32,
    pub point_stroke_color: Color,
    pub point_fill_color: Color,
}

impl Default for VectorStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::rgba(255, 255, 255, 0.2),
            stroke_color: Color::rgba(0, 0, 0, 0.5),
            stroke_width: 2.0,
            line_dash: vec![10.0, 10.0],
            point_radius: 5.0,
            point_stroke_color: Color::rgba(0, 0, 0, 0.7),
            point_fill_color: Color::rgba(255, 255, 255, 0.2),
        }
    }
}

impl VectorStyle {
    pub fn line_style(&self, opacity: f32) -> LineRenderStyle {
        LineRenderStyle {
            color: self.stroke_color.with_opacity(opacity),
            width: self.stroke_width,
            dash_pattern: self.line_dash.clone(),
        }
    }

    pub fn polygon_style(&self, opacity: f32) -> PolygonRenderStyle {
        PolygonRenderStyle {
            fill_color: self.fill_color.with_opacity(opacity),
            stroke: self.line_style(opacity),
        }
    }

    pub fn point_style(&self, opacity: f32) -> PointRenderStyle {
        PointRenderStyle {
            fill_color: self.point_fill_color.with_opacity(opacity),
            stroke_color: self.point_stroke_color.with_opacity(opacity),
            stroke_width: 1.0,
            radius: self.point_radius,
        }
    }

    /// Queue the draw commands for one geometry
    pub fn render_geometry(
        &self,
        geometry: &Geometry,
        context: &mut RenderContext,
        viewport: &Viewport,
        opacity: f32,
    ) {
        let to_pixels = |coords: &[LatLng]| -> Vec<Point> {
            coords.iter().map(|c| viewport.lat_lng_to_pixel(c)).collect()
        };

        match geometry {
            Geometry::Point(coord) => {
                context.render_point(&viewport.lat_lng_to_pixel(coord), &self.point_style(opacity));
            }
            Geometry::LineString(coords) => {
                context.render_line(&to_pixels(coords), &self.line_style(opacity));
            }
            Geometry::Polygon(coords) => {
                let ring = to_pixels(coords);
                if ring.len() >= 3 {
                    context.render_polygon(&ring, &self.polygon_style(opacity));
                } else {
                    context.render_line(&ring, &self.line_style(opacity));
                }
            }
        }
    }
}

/// Layer displaying the features of a [`VectorSource`]
pub struct VectorLayer {
    properties: LayerProperties,
    source: VectorSource,
    style: VectorStyle,
}

impl VectorLayer {
    pub fn new(id: String, source: VectorSource) -> Self {
        Self {
            properties: LayerProperties::new(id.clone(), id, LayerType::Vector),
            source,
            style: VectorStyle::default(),
        }
    }

    pub fn with_style(mut self, style: VectorStyle) -> Self {
        self.style = style;
        self
    }

    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    pub fn style(&self) -> &VectorStyle {
        &self.style
    }
}

impl LayerTrait for VectorLayer {
    impl_layer_properties!();

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        for feature in self.source.features() {
            self.style
                .render_geometry(&feature.geometry, context, viewport, self.properties.opacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::context::DrawCommand;

    #[test]
    fn test_source_clones_share_features() {
        let source = VectorSource::new();
        let handle = source.clone();

        handle.add_feature(Feature::new(Geometry::Point(LatLng::new(1.0, 2.0))));
        assert_eq!(source.len(), 1);

        source.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn test_feature_ids_are_unique() {
        let a = Feature::new(Geometry::LineString(vec![]));
        let b = Feature::new(Geometry::LineString(vec![]));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_last_coordinate() {
        let line = Geometry::LineString(vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]);
        assert_eq!(line.last_coordinate(), Some(LatLng::new(1.0, 1.0)));
        assert_eq!(Geometry::LineString(vec![]).last_coordinate(), None);
        assert_eq!(line.kind(), "LineString");
    }

    #[test]
    fn test_layer_renders_dashed_lines() {
        let source = VectorSource::new();
        source.add_feature(Feature::new(Geometry::LineString(vec![
            LatLng::new(-37.81, 144.96),
            LatLng::new(-37.82, 144.97),
        ])));
        let mut layer = VectorLayer::new("sketch".into(), source);
        let viewport = Viewport::new(LatLng::new(-37.8136, 144.9631), 10.0, Point::new(800.0, 500.0));
        let mut context = RenderContext::new(800, 500);

        layer.render(&mut context, &viewport).unwrap();

        match context.drawing_queue() {
            [DrawCommand::Line { points, style }] => {
                assert_eq!(points.len(), 2);
                assert_eq!(style.dash_pattern, vec![10.0, 10.0]);
                assert_eq!(style.width, 2.0);
            }
            other => panic!("unexpected queue: {other:?}"),
        }
    }
}
