use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// What the front end reports to a map. Positions are container pixels,
/// origin at the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Click {
        position: Point,
        button: MouseButton,
    },
    DoubleClick {
        position: Point,
    },
    /// Hover without a pressed button
    MouseMove {
        position: Point,
    },
    DragStart {
        position: Point,
    },
    Drag {
        delta: Point,
    },
    DragEnd,
    /// Wheel points; positive zooms in
    Scroll {
        delta: f64,
        position: Point,
    },
    KeyPress {
        key: KeyCode,
    },
    Resize {
        size: Point,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Enter,
    Escape,
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

/// Outcome of offering an event to an interaction. `Handled` stops
/// propagation to older interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventHandled {
    Handled,
    NotHandled,
}

impl InputEvent {
    /// Pointer position carried by the event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::Click { position, .. }
            | InputEvent::DoubleClick { position }
            | InputEvent::MouseMove { position }
            | InputEvent::DragStart { position }
            | InputEvent::Scroll { position, .. } => Some(*position),
            _ => None,
        }
    }
}
