pub mod base;
pub mod draw;
pub mod navigation;

pub use base::{InteractionId, InteractionTrait};
pub use draw::{Draw, DrawEvent, DrawOptions, DrawType, GeometryChange};
pub use navigation::{DragPan, MouseWheelZoom};
