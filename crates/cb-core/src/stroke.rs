//! Stroke segments: the unit of work handed from the draw layer to a raster.
//!
//! Segments are ephemeral. Once rendered they are dropped; no stroke history
//! is kept anywhere.

use crate::color::StrokeColor;
use kurbo::{Point, Rect};

/// How a segment affects the pixels underneath it.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeMode {
    /// Normal source-over painting with the given color.
    Pigment(StrokeColor),
    /// Destructive blending that removes existing alpha and color.
    Erase,
}

impl StrokeMode {
    /// The color this segment deposits, if any.
    pub fn pigment(&self) -> Option<&StrokeColor> {
        match self {
            Self::Pigment(color) => Some(color),
            Self::Erase => None,
        }
    }
}

/// A straight segment between two consecutive pointer positions.
///
/// Coordinates are logical pixels relative to the workspace origin.
/// Caps and joins are always round.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeSegment {
    pub from: Point,
    pub to: Point,
    /// Line width in logical pixels.
    pub width: f64,
    pub mode: StrokeMode,
}

impl StrokeSegment {
    pub fn new(from: Point, to: Point, width: f64, mode: StrokeMode) -> Self {
        Self {
            from,
            to,
            width,
            mode,
        }
    }

    /// Logical area the segment can touch, round caps included.
    pub fn bounds(&self) -> Rect {
        let half = self.width.max(0.0) / 2.0;
        Rect::from_points(self.from, self.to).inflate(half, half)
    }
}
