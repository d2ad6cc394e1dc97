//! Draw layer: pointer-driven freehand stroke state machine.
//!
//! `Idle → Drawing` on a gated pointer-down, `Drawing → Drawing` on every
//! move (one segment per move), `Drawing → Idle` on up, cancel or leave.
//! The machine never touches a raster itself; it returns `DrawEffect`s for
//! the caller to apply.

use crate::input::{PointerEvent, PointerPhase};
use crate::tools::{GateError, ToolState};
use cb_core::{Point, StrokeSegment};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawState {
    Idle,
    Drawing {
        pointer_id: i32,
        /// Last known position in logical pixels.
        last: Point,
    },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEffect {
    /// Pointer-down refused by the gate; warn the user.
    Rejected(GateError),
    /// Route all further input from this pointer to the drawing surface.
    Capture(i32),
    /// Suppress the platform's default gesture (touch scrolling).
    PreventDefault,
    /// Rasterize this segment onto the drawing surface.
    Paint(StrokeSegment),
    /// Release pointer capture. Failure to release is not an error.
    Release(i32),
}

#[derive(Debug, Clone)]
pub struct DrawLayer {
    state: DrawState,
}

impl Default for DrawLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawLayer {
    pub fn new() -> Self {
        Self {
            state: DrawState::Idle,
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    /// Drop any in-progress stroke without emitting effects.
    pub fn reset(&mut self) {
        self.state = DrawState::Idle;
    }

    /// Feed one pointer event through the state machine.
    pub fn handle(
        &mut self,
        event: &PointerEvent,
        tools: &ToolState,
        image_loaded: bool,
    ) -> Vec<DrawEffect> {
        match (self.state, event.phase) {
            (DrawState::Idle, PointerPhase::Down) => {
                if let Err(gate) = tools.can_draw(image_loaded) {
                    log::warn!("stroke refused: {gate}");
                    return vec![DrawEffect::Rejected(gate)];
                }
                log::debug!(
                    "stroke start pointer={} at ({}, {})",
                    event.pointer_id,
                    event.position.x,
                    event.position.y
                );
                self.state = DrawState::Drawing {
                    pointer_id: event.pointer_id,
                    last: event.position,
                };
                vec![DrawEffect::Capture(event.pointer_id)]
            }
            (DrawState::Drawing { pointer_id, last }, PointerPhase::Move)
                if pointer_id == event.pointer_id =>
            {
                self.state = DrawState::Drawing {
                    pointer_id,
                    last: event.position,
                };
                let mut effects = vec![DrawEffect::PreventDefault];
                if let Some(mode) = tools.stroke_mode() {
                    effects.push(DrawEffect::Paint(StrokeSegment::new(
                        last,
                        event.position,
                        tools.brush_size() as f64,
                        mode,
                    )));
                }
                effects
            }
            (DrawState::Drawing { pointer_id, .. }, phase)
                if phase.is_release() && pointer_id == event.pointer_id =>
            {
                log::debug!("stroke end pointer={pointer_id} ({phase:?})");
                self.state = DrawState::Idle;
                vec![DrawEffect::Release(pointer_id)]
            }
            // Moves and releases while idle, a second pointer-down while
            // drawing, and events from other pointers are all ignored.
            _ => vec![],
        }
    }
}
