use crate::{
    core::{
        constants::DEFAULT_SNAP_TOLERANCE_PX,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    input::{
        events::{EventHandled, InputEvent, KeyCode, MouseButton},
        handler::{ListenerKey, Observable},
    },
    interactions::base::InteractionTrait,
    layers::vector::{Feature, FeatureId, Geometry, VectorSource, VectorStyle},
    rendering::context::RenderContext,
    Result,
};
use serde::{Deserialize, Serialize};

/// Geometry kind produced by a [`Draw`] interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawType {
    LineString,
    Polygon,
}

impl DrawType {
    /// Committed vertices needed before a sketch can be finished by clicking
    fn min_points(self) -> usize {
        match self {
            DrawType::LineString => 2,
            DrawType::Polygon => 3,
        }
    }

    fn geometry(self, coords: Vec<LatLng>) -> Geometry {
        match self {
            DrawType::LineString => Geometry::LineString(coords),
            DrawType::Polygon => Geometry::Polygon(coords),
        }
    }
}

/// Payload of the draw start and draw end events
#[derive(Debug, Clone, PartialEq)]
pub struct DrawEvent {
    pub feature_id: FeatureId,
    /// Pointer location that started the sketch, or its last vertex on end
    pub coordinate: LatLng,
    pub geometry: Geometry,
}

/// Payload of a sketch geometry change
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryChange {
    pub feature_id: FeatureId,
    pub geometry: Geometry,
}

#[derive(Debug, Clone)]
pub struct DrawOptions {
    pub draw_type: DrawType,
    /// Pixel radius around the last vertex that finishes the sketch on click
    pub snap_tolerance_px: f64,
    pub style: VectorStyle,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            draw_type: DrawType::LineString,
            snap_tolerance_px: DEFAULT_SNAP_TOLERANCE_PX,
            style: VectorStyle::default(),
        }
    }
}

/// The in-progress feature. The last coordinate follows the pointer until
/// the next click commits it.
struct Sketch {
    feature_id: FeatureId,
    coords: Vec<LatLng>,
    change: Observable<GeometryChange>,
}

impl Sketch {
    fn committed(&self) -> &[LatLng] {
        &self.coords[..self.coords.len().saturating_sub(1)]
    }
}

/// Sketches one geometry at a time and adds each finished one to a
/// [`VectorSource`].
///
/// A click places a vertex (the first click starts the sketch), pointer
/// moves drag the trailing vertex, and the sketch is finished by a double
/// click, a click on the last placed vertex, the Enter key, or
/// [`Draw::finish_drawing`].
pub struct Draw {
    active: bool,
    options: DrawOptions,
    source: VectorSource,
    sketch: Option<Sketch>,
    draw_start: Observable<DrawEvent>,
    draw_end: Observable<DrawEvent>,
}

impl Draw {
    pub fn new(source: VectorSource, options: DrawOptions) -> Self {
        Self {
            active: true,
            options,
            source,
            sketch: None,
            draw_start: Observable::new(),
            draw_end: Observable::new(),
        }
    }

    pub fn line_string(source: VectorSource) -> Self {
        Self::new(source, DrawOptions::default())
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    pub fn source(&self) -> &VectorSource {
        &self.source
    }

    pub fn on_draw_start<F>(&mut self, callback: F) -> ListenerKey
    where
        F: Fn(&DrawEvent) + Send + Sync + 'static,
    {
        self.draw_start.on(callback)
    }

    pub fn on_draw_end<F>(&mut self, callback: F) -> ListenerKey
    where
        F: Fn(&DrawEvent) + Send + Sync + 'static,
    {
        self.draw_end.on(callback)
    }

    /// Listen to geometry changes of the current sketch. The listener lives
    /// as long as the sketch does. Returns `None` when nothing is being drawn.
    pub fn on_sketch_change<F>(&mut self, callback: F) -> Option<ListenerKey>
    where
        F: Fn(&GeometryChange) + Send + Sync + 'static,
    {
        self.sketch.as_mut().map(|sketch| sketch.change.on(callback))
    }

    /// Release a listener registered on this interaction or its sketch.
    /// Returns `false` if the key was not (or no longer) registered.
    pub fn un_by_key(&mut self, key: ListenerKey) -> bool {
        if self.draw_start.un_by_key(key) || self.draw_end.un_by_key(key) {
            return true;
        }
        self.sketch
            .as_mut()
            .map(|sketch| sketch.change.un_by_key(key))
            .unwrap_or(false)
    }

    pub fn is_drawing(&self) -> bool {
        self.sketch.is_some()
    }

    pub fn sketch_id(&self) -> Option<FeatureId> {
        self.sketch.as_ref().map(|s| s.feature_id)
    }

    pub fn sketch_geometry(&self) -> Option<Geometry> {
        self.sketch
            .as_ref()
            .map(|s| self.options.draw_type.geometry(s.coords.clone()))
    }

    /// Stop drawing and add the sketch, without its pointer-following
    /// vertex, to the source. Does nothing when not drawing.
    pub fn finish_drawing(&mut self) {
        let Some(mut sketch) = self.sketch.take() else {
            return;
        };

        sketch.coords.pop();
        let geometry = self.options.draw_type.geometry(sketch.coords.clone());
        sketch.change.emit(&GeometryChange {
            feature_id: sketch.feature_id,
            geometry: geometry.clone(),
        });

        let coordinate = geometry.last_coordinate().unwrap_or_default();
        self.source.add_feature(Feature {
            id: sketch.feature_id,
            geometry: geometry.clone(),
        });
        log::debug!(
            "draw end: feature {:?}, {} vertices",
            sketch.feature_id,
            geometry.coordinates().len()
        );
        self.draw_end.emit(&DrawEvent {
            feature_id: sketch.feature_id,
            coordinate,
            geometry,
        });
    }

    /// Discard the current sketch without raising draw end
    pub fn abort_drawing(&mut self) {
        if let Some(sketch) = self.sketch.take() {
            log::debug!("draw aborted: feature {:?}", sketch.feature_id);
        }
    }

    fn start_sketch(&mut self, coordinate: LatLng) {
        let sketch = Sketch {
            feature_id: FeatureId::next(),
            coords: vec![coordinate, coordinate],
            change: Observable::new(),
        };
        let event = DrawEvent {
            feature_id: sketch.feature_id,
            coordinate,
            geometry: self.options.draw_type.geometry(sketch.coords.clone()),
        };
        log::debug!("draw start: feature {:?}", sketch.feature_id);
        self.sketch = Some(sketch);
        self.draw_start.emit(&event);
    }

    /// Whether a click at `position` lands on a vertex that ends the sketch
    fn at_finish(&self, sketch: &Sketch, position: &Point, viewport: &Viewport) -> bool {
        let committed = sketch.committed();
        if committed.len() < self.options.draw_type.min_points() {
            return false;
        }

        let mut candidates = vec![committed[committed.len() - 1]];
        if self.options.draw_type == DrawType::Polygon {
            candidates.push(committed[0]);
        }

        candidates.iter().any(|vertex| {
            viewport.lat_lng_to_pixel(vertex).distance_to(position) <= self.options.snap_tolerance_px
        })
    }

    fn handle_click(&mut self, position: &Point, viewport: &Viewport) {
        let coordinate = viewport.pixel_to_lat_lng(position);

        let finish = match &self.sketch {
            None => {
                self.start_sketch(coordinate);
                return;
            }
            Some(sketch) => self.at_finish(sketch, position, viewport),
        };

        if finish {
            self.finish_drawing();
            return;
        }

        if let Some(sketch) = self.sketch.as_mut() {
            if let Some(trailing) = sketch.coords.last_mut() {
                *trailing = coordinate;
            }
            sketch.coords.push(coordinate);
            let change = GeometryChange {
                feature_id: sketch.feature_id,
                geometry: self.options.draw_type.geometry(sketch.coords.clone()),
            };
            sketch.change.emit(&change);
        }
    }

    fn handle_pointer_move(&mut self, position: &Point, viewport: &Viewport) {
        let draw_type = self.options.draw_type;
        if let Some(sketch) = self.sketch.as_mut() {
            let coordinate = viewport.pixel_to_lat_lng(position);
            if let Some(trailing) = sketch.coords.last_mut() {
                if *trailing == coordinate {
                    return;
                }
                *trailing = coordinate;
            }
            sketch.change.emit(&GeometryChange {
                feature_id: sketch.feature_id,
                geometry: draw_type.geometry(sketch.coords.clone()),
            });
        }
    }
}

impl InteractionTrait for Draw {
    fn name(&self) -> &str {
        "draw"
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.abort_drawing();
        }
    }

    fn handle_input(&mut self, input: &InputEvent, viewport: &mut Viewport) -> EventHandled {
        match input {
            InputEvent::Click {
                position,
                button: MouseButton::Left,
            } => {
                self.handle_click(position, viewport);
                EventHandled::Handled
            }
            InputEvent::DoubleClick { .. } => {
                // Never starts a sketch; swallowed so it does not zoom
                self.finish_drawing();
                EventHandled::Handled
            }
            InputEvent::MouseMove { position } => {
                self.handle_pointer_move(position, viewport);
                EventHandled::NotHandled
            }
            InputEvent::KeyPress { key: KeyCode::Enter } if self.is_drawing() => {
                self.finish_drawing();
                EventHandled::Handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    fn render(&mut self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        if let Some(sketch) = &self.sketch {
            let style = &self.options.style;
            let geometry = self.options.draw_type.geometry(sketch.coords.clone());
            style.render_geometry(&geometry, context, viewport, 1.0);
            if let Some(cursor) = sketch.coords.last() {
                style.render_geometry(&Geometry::Point(*cursor), context, viewport, 1.0);
            }
        }
        Ok(())
    }

    fn on_remove(&mut self) {
        self.abort_drawing();
        self.draw_start.clear();
        self.draw_end.clear();
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
