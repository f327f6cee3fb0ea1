pub mod format;
pub mod session;
pub mod tooltip;

pub use format::{format_length, format_meters};
pub use session::{MeasureSession, MeasureSignal, SessionState};
pub use tooltip::TooltipState;
