//! Map overlays: small labelled elements pinned to a map coordinate.

use crate::{
    core::{geo::LatLng, viewport::Viewport},
    rendering::context::{Color, RenderContext},
};
use serde::{Deserialize, Serialize};

/// Identity of an overlay on its map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

/// Which point of the overlay element sits on its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Positioning {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    CenterCenter,
    CenterRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl Positioning {
    /// Fraction of the element's width and height at which the anchor lies
    pub fn anchor_fraction(self) -> [f32; 2] {
        let x = match self {
            Positioning::TopLeft | Positioning::CenterLeft | Positioning::BottomLeft => 0.0,
            Positioning::TopCenter | Positioning::CenterCenter | Positioning::BottomCenter => 0.5,
            Positioning::TopRight | Positioning::CenterRight | Positioning::BottomRight => 1.0,
        };
        let y = match self {
            Positioning::TopLeft | Positioning::TopCenter | Positioning::TopRight => 0.0,
            Positioning::CenterLeft | Positioning::CenterCenter | Positioning::CenterRight => 0.5,
            Positioning::BottomLeft | Positioning::BottomCenter | Positioning::BottomRight => 1.0,
        };
        [x, y]
    }
}

/// Content of an overlay
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlayElement {
    /// Space-separated style classes
    pub class_name: String,
    pub text: String,
}

impl OverlayElement {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            text: String::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_name.split_whitespace().any(|c| c == class)
    }
}

/// An element bound to a map coordinate. Overlays without a position are
/// kept but not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    element: OverlayElement,
    position: Option<LatLng>,
    /// Pixel offset from the anchor, applied after positioning
    offset: [f32; 2],
    positioning: Positioning,
    /// Whether pointer events on the element are kept from the map
    stop_event: bool,
    /// Stack below overlays added earlier
    insert_first: bool,
}

impl Overlay {
    pub fn new(element: OverlayElement) -> Self {
        Self {
            element,
            position: None,
            offset: [0.0, 0.0],
            positioning: Positioning::TopLeft,
            stop_event: true,
            insert_first: true,
        }
    }

    pub fn with_offset(mut self, offset: [f32; 2]) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_positioning(mut self, positioning: Positioning) -> Self {
        self.positioning = positioning;
        self
    }

    pub fn with_stop_event(mut self, stop_event: bool) -> Self {
        self.stop_event = stop_event;
        self
    }

    pub fn with_insert_first(mut self, insert_first: bool) -> Self {
        self.insert_first = insert_first;
        self
    }

    pub fn element(&self) -> &OverlayElement {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut OverlayElement {
        &mut self.element
    }

    pub fn text(&self) -> &str {
        &self.element.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.element.text = text.into();
    }

    pub fn class_name(&self) -> &str {
        &self.element.class_name
    }

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.element.class_name = class_name.into();
    }

    pub fn position(&self) -> Option<LatLng> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<LatLng>) {
        self.position = position;
    }

    pub fn offset(&self) -> [f32; 2] {
        self.offset
    }

    pub fn set_offset(&mut self, offset: [f32; 2]) {
        self.offset = offset;
    }

    pub fn positioning(&self) -> Positioning {
        self.positioning
    }

    pub fn stop_event(&self) -> bool {
        self.stop_event
    }

    pub fn insert_first(&self) -> bool {
        self.insert_first
    }
}

/// Overlays of one map, in stacking order (bottom first)
#[derive(Debug, Default)]
pub struct OverlayManager {
    overlays: Vec<(OverlayId, Overlay)>,
    next_id: u64,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, overlay: Overlay) -> OverlayId {
        self.next_id += 1;
        let id = OverlayId(self.next_id);
        if overlay.insert_first {
            self.overlays.insert(0, (id, overlay));
        } else {
            self.overlays.push((id, overlay));
        }
        id
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<Overlay> {
        let index = self.overlays.iter().position(|(oid, _)| *oid == id)?;
        Some(self.overlays.remove(index).1)
    }

    pub fn get(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays
            .iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, overlay)| overlay)
    }

    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, overlay)| overlay)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OverlayId, &Overlay)> {
        self.overlays.iter().map(|(id, overlay)| (*id, overlay))
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    pub fn clear(&mut self) {
        self.overlays.clear();
    }

    /// Queue every positioned overlay, bottom of the stack first
    pub fn render(&self, context: &mut RenderContext, viewport: &Viewport) {
        for (id, overlay) in &self.overlays {
            let Some(position) = overlay.position else {
                continue;
            };
            context.render_overlay(
                *id,
                &overlay.element.text,
                &overlay.element.class_name,
                viewport.lat_lng_to_pixel(&position),
                overlay.offset,
                overlay.positioning,
            );
        }
    }
}

/// Visual treatment of an overlay, chosen from its classes
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub background: Color,
    pub text_color: Color,
    pub font_size: f32,
    pub padding: [f32; 2],
    pub rounding: f32,
    /// Height of the pointer triangle under bottom-anchored labels
    pub arrow_size: f32,
    pub border: Option<Color>,
}

impl OverlayStyle {
    /// Label for an in-progress measurement
    pub fn measure() -> Self {
        Self {
            background: Color::rgba(0, 0, 0, 0.5),
            text_color: Color::WHITE,
            font_size: 12.0,
            padding: [8.0, 4.0],
            rounding: 4.0,
            arrow_size: 6.0,
            border: None,
        }
    }

    /// Label frozen on a finished measurement
    pub fn frozen() -> Self {
        Self {
            background: Color::rgb(0xff, 0xcc, 0x33),
            text_color: Color::BLACK,
            border: Some(Color::WHITE),
            ..Self::measure()
        }
    }

    pub fn for_element(element: &OverlayElement) -> Self {
        if element.has_class("tooltip-static") {
            Self::frozen()
        } else if element.has_class("tooltip") {
            Self::measure()
        } else {
            Self {
                background: Color::WHITE,
                text_color: Color::BLACK,
                arrow_size: 0.0,
                border: Some(Color::rgb(0xcc, 0xcc, 0xcc)),
                ..Self::measure()
            }
        }
    }
}
