use crate::{
    core::{
        config::MapConfig,
        constants::{DEFAULT_CONTAINER_HEIGHT_PX, FALLBACK_CONTAINER_WIDTH_PX},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    input::events::{EventHandled, InputEvent},
    interactions::{
        base::{InteractionId, InteractionTrait},
        navigation::{DragPan, MouseWheelZoom},
    },
    layers::{base::LayerTrait, manager::LayerManager, tile::TileLayer},
    rendering::context::RenderContext,
    ui::overlay::{Overlay, OverlayId, OverlayManager},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Id of the base imagery layer created by [`Map::from_config`]
pub const BASE_LAYER_ID: &str = "base";

/// One side of the container a map is mounted into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Px(f32),
    /// Share of the space the UI offers
    Percent(f32),
}

impl Dimension {
    /// Pixel size given `available` pixels
    pub fn resolve(&self, available: f32) -> f32 {
        match *self {
            Dimension::Px(px) => px,
            Dimension::Percent(pct) => available * pct / 100.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Dimension::Px(v) | Dimension::Percent(v) => v.is_finite() && v > 0.0,
        }
    }
}

/// The container surface a map renders into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTarget {
    pub id: String,
    pub width: Dimension,
    pub height: Dimension,
}

impl MapTarget {
    pub fn new(id: impl Into<String>, width: Dimension, height: Dimension) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// Container size in pixels given the space the UI offers
    pub fn resolve_size(&self, available: Point) -> Point {
        Point::new(
            self.width.resolve(available.x as f32) as f64,
            self.height.resolve(available.y as f32) as f64,
        )
    }
}

impl Default for MapTarget {
    fn default() -> Self {
        Self::new(
            "map",
            Dimension::Percent(100.0),
            Dimension::Px(DEFAULT_CONTAINER_HEIGHT_PX),
        )
    }
}

struct InteractionEntry {
    id: InteractionId,
    interaction: Box<dyn InteractionTrait>,
}

/// The map host: camera, layers, overlays and interactions bound to a
/// container target.
///
/// A map without a target is inert: it ignores input and renders nothing.
pub struct Map {
    target: Option<MapTarget>,
    viewport: Viewport,
    layer_manager: LayerManager,
    overlays: OverlayManager,
    interactions: Vec<InteractionEntry>,
    next_interaction_id: u64,
}

impl Map {
    /// Creates a map with the default pan and zoom interactions and no layers
    pub fn new(target: MapTarget, center: LatLng, zoom: f64) -> Self {
        let size = target.resolve_size(Point::new(
            FALLBACK_CONTAINER_WIDTH_PX as f64,
            DEFAULT_CONTAINER_HEIGHT_PX as f64,
        ));
        let mut map = Self {
            target: Some(target),
            viewport: Viewport::new(center, zoom, size),
            layer_manager: LayerManager::new(),
            overlays: OverlayManager::new(),
            interactions: Vec::new(),
            next_interaction_id: 0,
        };
        map.add_interaction(Box::new(DragPan::new()));
        map.add_interaction(Box::new(MouseWheelZoom::new()));
        map
    }

    /// Creates a map from configuration, with its base tile layer
    pub fn from_config(config: &MapConfig) -> Result<Self> {
        config.validate()?;

        let mut map = Self::new(config.target.to_target(), config.view.center(), config.view.zoom);
        map.viewport
            .set_zoom_limits(config.view.min_zoom, config.view.max_zoom);
        map.add_layer(Box::new(TileLayer::from_options(
            BASE_LAYER_ID.to_string(),
            config.tiles.clone(),
        )))?;
        Ok(map)
    }

    /// Binds or, with `None`, detaches the container target
    pub fn set_target(&mut self, target: Option<MapTarget>) {
        match (&self.target, &target) {
            (Some(old), None) => log::info!("map detached from '{}'", old.id),
            (_, Some(new)) => log::info!("map attached to '{}'", new.id),
            (None, None) => {}
        }
        self.target = target;
    }

    pub fn target(&self) -> Option<&MapTarget> {
        self.target.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.target.is_some()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Container resize, in pixels
    pub fn set_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        self.layer_manager.add_layer(layer)
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Result<Box<dyn LayerTrait>> {
        self.layer_manager
            .remove_layer(layer_id)
            .ok_or_else(|| Error::Layer(format!("no layer '{layer_id}'")).into())
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn LayerTrait) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    pub fn add_overlay(&mut self, overlay: Overlay) -> OverlayId {
        self.overlays.add(overlay)
    }

    pub fn remove_overlay(&mut self, id: OverlayId) -> Result<Overlay> {
        self.overlays
            .remove(id)
            .ok_or_else(|| Error::Overlay(format!("no overlay {id:?}")).into())
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(id)
    }

    pub fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays.get_mut(id)
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn add_interaction(&mut self, interaction: Box<dyn InteractionTrait>) -> InteractionId {
        self.next_interaction_id += 1;
        let id = InteractionId(self.next_interaction_id);
        log::debug!("interaction '{}' added as {:?}", interaction.name(), id);
        self.interactions.push(InteractionEntry { id, interaction });
        id
    }

    pub fn remove_interaction(&mut self, id: InteractionId) -> Option<Box<dyn InteractionTrait>> {
        let index = self.interactions.iter().position(|entry| entry.id == id)?;
        let mut entry = self.interactions.remove(index);
        entry.interaction.on_remove();
        Some(entry.interaction)
    }

    /// Runs `f` on the first interaction of type `T`
    pub fn with_interaction_mut<T, F, R>(&mut self, f: F) -> Option<R>
    where
        T: InteractionTrait + 'static,
        F: FnOnce(&mut T) -> R,
    {
        self.interactions
            .iter_mut()
            .find_map(|entry| entry.interaction.as_any_mut().downcast_mut::<T>())
            .map(f)
    }

    pub fn interaction<T>(&self) -> Option<&T>
    where
        T: InteractionTrait + 'static,
    {
        self.interactions
            .iter()
            .find_map(|entry| entry.interaction.as_any().downcast_ref::<T>())
    }

    pub fn interaction_names(&self) -> Vec<String> {
        self.interactions
            .iter()
            .map(|entry| entry.interaction.name().to_string())
            .collect()
    }

    /// Offers `input` to the active interactions, newest first, until one
    /// handles it. Ignored while the map has no target.
    pub fn handle_input(&mut self, input: InputEvent) -> EventHandled {
        if self.target.is_none() {
            log::trace!("input ignored on detached map: {input:?}");
            return EventHandled::NotHandled;
        }

        if let InputEvent::Resize { size } = input {
            self.set_size(size);
            return EventHandled::Handled;
        }

        for entry in self.interactions.iter_mut().rev() {
            if !entry.interaction.is_active() {
                continue;
            }
            if entry.interaction.handle_input(&input, &mut self.viewport) == EventHandled::Handled {
                return EventHandled::Handled;
            }
        }
        EventHandled::NotHandled
    }

    /// Queues the frame: layers in z order, interaction sketches, then
    /// overlays. Returns `false`, with an empty queue, when detached.
    pub fn render(&mut self, context: &mut RenderContext) -> Result<bool> {
        context.begin_frame();
        if self.target.is_none() {
            return Ok(false);
        }

        self.layer_manager.render(context, &self.viewport)?;
        for entry in &mut self.interactions {
            if entry.interaction.is_active() {
                entry.interaction.render(context, &self.viewport)?;
            }
        }
        self.overlays.render(context, &self.viewport);
        Ok(true)
    }

    /// Attribution texts of the visible tile layers
    pub fn attributions(&self) -> Vec<String> {
        self.layer_manager
            .list_layers()
            .iter()
            .filter_map(|id| self.layer_manager.get_layer(id))
            .filter(|layer| layer.is_visible())
            .filter_map(|layer| layer.as_any().downcast_ref::<TileLayer>())
            .map(|tile| tile.source().attribution().to_string())
            .filter(|text| !text.is_empty())
            .collect()
    }
}
