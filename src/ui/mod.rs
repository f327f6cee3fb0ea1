pub mod overlay;

#[cfg(feature = "egui")]
pub mod widget;

pub use overlay::{Overlay, OverlayElement, OverlayId, OverlayManager, OverlayStyle, Positioning};

#[cfg(feature = "egui")]
pub use widget::{MeasureMapWidget, UiMeasureMapExt};
