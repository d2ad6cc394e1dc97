//! Input abstraction layer.
//!
//! Normalizes DOM pointer events (mouse, touch, pen) into a plain value
//! consumed by the draw layer, so stroke logic never touches a windowing API.

use cb_core::Point;

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// Pointer pressed (mouse down, touch start, pen contact).
    Down,
    Move,
    Up,
    /// The platform aborted the pointer stream.
    Cancel,
    /// Pointer left the drawing surface.
    Leave,
}

impl PointerPhase {
    /// Map a DOM event type name (`pointerdown`, `pointermove`, ...).
    pub fn from_event_type(name: &str) -> Option<Self> {
        match name {
            "pointerdown" => Some(Self::Down),
            "pointermove" => Some(Self::Move),
            "pointerup" => Some(Self::Up),
            "pointercancel" => Some(Self::Cancel),
            "pointerleave" => Some(Self::Leave),
            _ => None,
        }
    }

    /// Phases that end an active stroke.
    pub fn is_release(self) -> bool {
        matches!(self, Self::Up | Self::Cancel | Self::Leave)
    }
}

/// A normalized pointer event.
///
/// `position` is in logical pixels relative to the drawing surface's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i32,
    pub position: Point,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn new(pointer_id: i32, x: f64, y: f64, phase: PointerPhase) -> Self {
        Self {
            pointer_id,
            position: Point::new(x, y),
            phase,
        }
    }

    pub fn down(pointer_id: i32, x: f64, y: f64) -> Self {
        Self::new(pointer_id, x, y, PointerPhase::Down)
    }

    pub fn moved(pointer_id: i32, x: f64, y: f64) -> Self {
        Self::new(pointer_id, x, y, PointerPhase::Move)
    }

    pub fn up(pointer_id: i32, x: f64, y: f64) -> Self {
        Self::new(pointer_id, x, y, PointerPhase::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_event_names_map_to_phases() {
        assert_eq!(PointerPhase::from_event_type("pointerdown"), Some(PointerPhase::Down));
        assert_eq!(PointerPhase::from_event_type("pointerleave"), Some(PointerPhase::Leave));
        assert_eq!(PointerPhase::from_event_type("click"), None);
    }

    #[test]
    fn release_phases() {
        assert!(PointerPhase::Up.is_release());
        assert!(PointerPhase::Cancel.is_release());
        assert!(PointerPhase::Leave.is_release());
        assert!(!PointerPhase::Move.is_release());
        assert!(!PointerPhase::Down.is_release());
    }
}
