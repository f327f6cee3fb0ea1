//! The measure label overlay and its two states.

use crate::{
    core::constants::{LIVE_TOOLTIP_OFFSET, STATIC_TOOLTIP_OFFSET},
    ui::overlay::{Overlay, OverlayElement, Positioning},
};

pub const LIVE_CLASS: &str = "tooltip tooltip-measure";
pub const STATIC_CLASS: &str = "tooltip tooltip-static";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipState {
    /// Follows the sketch being drawn
    Live,
    /// Frozen on a finished sketch
    Static,
}

impl TooltipState {
    /// State of a measure overlay, or `None` for any other overlay
    pub fn of(overlay: &Overlay) -> Option<Self> {
        let element = overlay.element();
        if !element.has_class("tooltip") {
            None
        } else if element.has_class("tooltip-static") {
            Some(TooltipState::Static)
        } else if element.has_class("tooltip-measure") {
            Some(TooltipState::Live)
        } else {
            None
        }
    }
}

/// A fresh live tooltip: empty, unpositioned, bottom-centered above its
/// anchor, letting pointer events through to the map
pub fn live_tooltip() -> Overlay {
    Overlay::new(OverlayElement::new(LIVE_CLASS))
        .with_offset(LIVE_TOOLTIP_OFFSET)
        .with_positioning(Positioning::BottomCenter)
        .with_stop_event(false)
        .with_insert_first(false)
}

/// Turns a live tooltip into a static annotation, keeping its label and
/// position
pub fn freeze(overlay: &mut Overlay) {
    overlay.set_class_name(STATIC_CLASS);
    overlay.set_offset(STATIC_TOOLTIP_OFFSET);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    #[test]
    fn test_live_tooltip_defaults() {
        let tooltip = live_tooltip();
        assert_eq!(tooltip.class_name(), LIVE_CLASS);
        assert_eq!(tooltip.offset(), [0.0, -15.0]);
        assert_eq!(tooltip.positioning(), Positioning::BottomCenter);
        assert!(!tooltip.stop_event());
        assert!(!tooltip.insert_first());
        assert_eq!(tooltip.position(), None);
        assert_eq!(TooltipState::of(&tooltip), Some(TooltipState::Live));
    }

    #[test]
    fn test_freeze_keeps_content() {
        let mut tooltip = live_tooltip();
        tooltip.set_text("1.23 km");
        tooltip.set_position(Some(LatLng::new(1.0, 2.0)));

        freeze(&mut tooltip);

        assert_eq!(TooltipState::of(&tooltip), Some(TooltipState::Static));
        assert_eq!(tooltip.offset(), [0.0, -7.0]);
        assert_eq!(tooltip.text(), "1.23 km");
        assert_eq!(tooltip.position(), Some(LatLng::new(1.0, 2.0)));
    }

    #[test]
    fn test_other_overlays_have_no_state() {
        assert_eq!(TooltipState::of(&Overlay::new(OverlayElement::new("popup"))), None);
    }
}
