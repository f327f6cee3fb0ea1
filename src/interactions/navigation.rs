//! Default camera interactions.

use crate::{
    core::{constants::WHEEL_DELTA_PER_ZOOM, viewport::Viewport},
    input::events::{EventHandled, InputEvent, KeyCode},
    interactions::base::InteractionTrait,
};

/// Pans the view while the pointer is dragged
#[derive(Debug)]
pub struct DragPan {
    active: bool,
    dragging: bool,
}

impl DragPan {
    pub fn new() -> Self {
        Self {
            active: true,
            dragging: false,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl Default for DragPan {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionTrait for DragPan {
    fn name(&self) -> &str {
        "drag-pan"
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.dragging = false;
        }
    }

    fn handle_input(&mut self, input: &InputEvent, viewport: &mut Viewport) -> EventHandled {
        match input {
            InputEvent::DragStart { .. } => {
                self.dragging = true;
                EventHandled::Handled
            }
            InputEvent::Drag { delta } if self.dragging => {
                viewport.pan(*delta);
                EventHandled::Handled
            }
            InputEvent::DragEnd if self.dragging => {
                self.dragging = false;
                EventHandled::Handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Zooms around the pointer on wheel input, and around the center on
/// `+`/`-` keys
#[derive(Debug)]
pub struct MouseWheelZoom {
    active: bool,
    /// Wheel delta that equals one zoom level
    delta_per_zoom: f64,
}

impl MouseWheelZoom {
    pub fn new() -> Self {
        Self {
            active: true,
            delta_per_zoom: WHEEL_DELTA_PER_ZOOM,
        }
    }
}

impl Default for MouseWheelZoom {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionTrait for MouseWheelZoom {
    fn name(&self) -> &str {
        "mouse-wheel-zoom"
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn handle_input(&mut self, input: &InputEvent, viewport: &mut Viewport) -> EventHandled {
        match input {
            InputEvent::Scroll { delta, position } if *delta != 0.0 => {
                let zoom = viewport.zoom + delta / self.delta_per_zoom;
                viewport.zoom_to(zoom, Some(*position));
                EventHandled::Handled
            }
            InputEvent::KeyPress { key: KeyCode::Plus } => {
                viewport.zoom_to(viewport.zoom.floor() + 1.0, None);
                EventHandled::Handled
            }
            InputEvent::KeyPress { key: KeyCode::Minus } => {
                viewport.zoom_to(viewport.zoom.ceil() - 1.0, None);
                EventHandled::Handled
            }
            _ => EventHandled::NotHandled,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, Point};

    fn viewport() -> Viewport {
        Viewport::new(LatLng::new(-37.8136, 144.9631), 10.0, Point::new(800.0, 500.0))
    }

    #[test]
    fn test_drag_moves_center() {
        let mut pan = DragPan::new();
        let mut viewport = viewport();
        let before = viewport.center;

        // A drag delta without a drag start is not ours
        assert_eq!(
            pan.handle_input(&InputEvent::Drag { delta: Point::new(50.0, 0.0) }, &mut viewport),
            EventHandled::NotHandled
        );

        pan.handle_input(&InputEvent::DragStart { position: Point::new(400.0, 250.0) }, &mut viewport);
        pan.handle_input(&InputEvent::Drag { delta: Point::new(50.0, 0.0) }, &mut viewport);
        pan.handle_input(&InputEvent::DragEnd, &mut viewport);

        // Dragging right reveals what lies to the west
        assert!(viewport.center.lng < before.lng);
        assert!((viewport.center.lat - before.lat).abs() < 1e-9);
        assert!(!pan.is_dragging());
    }

    #[test]
    fn test_wheel_zoom_keeps_pointer_location() {
        let mut zoom = MouseWheelZoom::new();
        let mut viewport = viewport();
        let pointer = Point::new(200.0, 100.0);
        let under_pointer = viewport.pixel_to_lat_lng(&pointer);

        let handled = zoom.handle_input(
            &InputEvent::Scroll { delta: 120.0, position: pointer },
            &mut viewport,
        );

        assert_eq!(handled, EventHandled::Handled);
        assert!((viewport.zoom - 11.0).abs() < 1e-9);
        let after = viewport.lat_lng_to_pixel(&under_pointer);
        assert!(after.distance_to(&pointer) < 1e-6);
    }

    #[test]
    fn test_keyboard_zoom_steps_whole_levels() {
        let mut zoom = MouseWheelZoom::new();
        let mut viewport = viewport();

        zoom.handle_input(&InputEvent::KeyPress { key: KeyCode::Minus }, &mut viewport);
        assert_eq!(viewport.zoom, 9.0);
        zoom.handle_input(&InputEvent::KeyPress { key: KeyCode::Plus }, &mut viewport);
        assert_eq!(viewport.zoom, 10.0);
    }
}
