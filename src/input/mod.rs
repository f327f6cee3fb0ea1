pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{EventHandled, InputEvent, KeyCode, MouseButton};
pub use handler::{ListenerKey, Observable};
