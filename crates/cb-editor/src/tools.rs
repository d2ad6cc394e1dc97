//! Tool state: active color, brush size, eraser toggle, used colors.
//!
//! Also owns the drawing gate: a stroke may only start once an image is
//! loaded and either a color has been chosen or the eraser is active.

use cb_core::{ColorError, StrokeColor, StrokeMode};
use thiserror::Error;

/// Brush width used before the user touches the size control.
pub const DEFAULT_BRUSH_SIZE: u32 = 12;

/// Widest brush the size control may select.
pub const MAX_BRUSH_SIZE: u32 = 256;

/// Why a stroke was refused at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("select an image before drawing")]
    NoImage,
    #[error("select a color to draw (or turn on the eraser)")]
    NoColor,
}

#[derive(Debug, Clone)]
pub struct ToolState {
    color: Option<StrokeColor>,
    /// Set by `choose_color`; the eraser does not clear it.
    chosen: bool,
    eraser: bool,
    brush_size: u32,
    default_brush_size: u32,
    max_brush_size: u32,
    /// Distinct pigment colors in first-use order.
    used_colors: Vec<StrokeColor>,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE)
    }
}

impl ToolState {
    /// The default is clamped into `1..=max_brush_size`.
    pub fn new(default_brush_size: u32, max_brush_size: u32) -> Self {
        let max_brush_size = max_brush_size.max(1);
        let default_brush_size = default_brush_size.clamp(1, max_brush_size);
        Self {
            color: None,
            chosen: false,
            eraser: false,
            brush_size: default_brush_size,
            default_brush_size,
            max_brush_size,
            used_colors: Vec::new(),
        }
    }

    /// Check whether a stroke may start.
    pub fn can_draw(&self, image_loaded: bool) -> Result<(), GateError> {
        if !image_loaded {
            return Err(GateError::NoImage);
        }
        if !self.chosen && !self.eraser {
            return Err(GateError::NoColor);
        }
        Ok(())
    }

    /// Select a pigment color. Turns the eraser off.
    ///
    /// Empty input is `ColorError::Empty` and leaves the state untouched,
    /// as does anything that does not parse as a CSS color.
    pub fn choose_color(&mut self, value: &str) -> Result<&StrokeColor, ColorError> {
        let color = StrokeColor::parse(value)?;
        self.chosen = true;
        self.eraser = false;
        Ok(self.color.insert(color))
    }

    /// Flip the eraser. The stored color and `chosen` flag are kept.
    pub fn toggle_eraser(&mut self) -> bool {
        self.eraser = !self.eraser;
        self.eraser
    }

    /// Parse a size control value. Anything that is not a positive finite
    /// number falls back to the default width; larger values are capped.
    pub fn set_brush_size(&mut self, value: &str) -> u32 {
        self.brush_size = match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => {
                (v.round().min(f64::from(self.max_brush_size)) as u32).max(1)
            }
            _ => self.default_brush_size,
        };
        self.brush_size
    }

    /// Render mode for the next segment, `None` if there is nothing to
    /// paint with.
    pub fn stroke_mode(&self) -> Option<StrokeMode> {
        if self.eraser {
            Some(StrokeMode::Erase)
        } else {
            self.color.clone().map(StrokeMode::Pigment)
        }
    }

    /// Add a color to the used set. Duplicates are ignored.
    pub fn record_use(&mut self, color: &StrokeColor) {
        if !self.used_colors.contains(color) {
            self.used_colors.push(color.clone());
        }
    }

    pub fn used_colors(&self) -> &[StrokeColor] {
        &self.used_colors
    }

    pub fn color(&self) -> Option<&StrokeColor> {
        self.color.as_ref()
    }

    pub fn is_chosen(&self) -> bool {
        self.chosen
    }

    pub fn eraser(&self) -> bool {
        self.eraser
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    pub fn default_brush_size(&self) -> u32 {
        self.default_brush_size
    }

    pub fn max_brush_size(&self) -> u32 {
        self.max_brush_size
    }

    /// Back to a fresh session: no color, eraser off, default brush,
    /// empty used-colors.
    pub fn reset(&mut self) {
        *self = Self::new(self.default_brush_size, self.max_brush_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn gate_requires_image_first() {
        let mut tools = ToolState::default();
        tools.choose_color("#ff0000").unwrap();
        assert_eq!(tools.can_draw(false), Err(GateError::NoImage));
        assert_eq!(tools.can_draw(true), Ok(()));
    }

    #[test]
    fn gate_requires_color_or_eraser() {
        let mut tools = ToolState::default();
        assert_eq!(tools.can_draw(true), Err(GateError::NoColor));
        tools.toggle_eraser();
        assert_eq!(tools.can_draw(true), Ok(()));
    }

    #[test]
    fn choosing_a_color_turns_eraser_off() {
        let mut tools = ToolState::default();
        tools.toggle_eraser();
        tools.choose_color("#00ff00").unwrap();
        assert!(!tools.eraser());
        assert!(tools.is_chosen());
        assert_eq!(tools.color().map(|c| c.as_str()), Some("#00ff00"));
    }

    #[test]
    fn empty_color_is_ignored() {
        let mut tools = ToolState::default();
        tools.toggle_eraser();
        assert_eq!(tools.choose_color("").unwrap_err(), ColorError::Empty);
        assert!(tools.eraser());
        assert!(!tools.is_chosen());
        assert!(tools.color().is_none());
    }

    #[test]
    fn eraser_keeps_color_and_chosen() {
        let mut tools = ToolState::default();
        tools.choose_color("#123456").unwrap();
        assert!(tools.toggle_eraser());
        assert!(tools.is_chosen());
        assert_eq!(tools.color().map(|c| c.as_str()), Some("#123456"));
        assert_eq!(tools.stroke_mode(), Some(StrokeMode::Erase));
        assert!(!tools.toggle_eraser());
        assert!(matches!(tools.stroke_mode(), Some(StrokeMode::Pigment(_))));
    }

    #[test]
    fn brush_size_parsing() {
        let mut tools = ToolState::default();
        assert_eq!(tools.set_brush_size("8"), 8);
        assert_eq!(tools.set_brush_size(" 20 "), 20);
        assert_eq!(tools.set_brush_size("3.6"), 4);
        assert_eq!(tools.set_brush_size("abc"), DEFAULT_BRUSH_SIZE);
        assert_eq!(tools.set_brush_size(""), DEFAULT_BRUSH_SIZE);
        assert_eq!(tools.set_brush_size("0"), DEFAULT_BRUSH_SIZE);
        assert_eq!(tools.set_brush_size("-4"), DEFAULT_BRUSH_SIZE);
        assert_eq!(tools.set_brush_size("NaN"), DEFAULT_BRUSH_SIZE);
        assert_eq!(tools.set_brush_size("0.2"), 1);
    }

    #[test]
    fn oversized_brush_is_capped() {
        let mut tools = ToolState::default();
        assert_eq!(tools.set_brush_size("1e30"), MAX_BRUSH_SIZE);
        assert_eq!(tools.set_brush_size("257"), MAX_BRUSH_SIZE);

        let mut narrow = ToolState::new(40, 30);
        assert_eq!(narrow.default_brush_size(), 30);
        assert_eq!(narrow.set_brush_size("31"), 30);
        assert_eq!(narrow.max_brush_size(), 30);
    }

    #[test]
    fn used_colors_are_unique_in_first_use_order() {
        let mut tools = ToolState::default();
        let red = StrokeColor::parse("#ff0000").unwrap();
        let blue = StrokeColor::parse("#0000ff").unwrap();
        tools.record_use(&red);
        tools.record_use(&blue);
        tools.record_use(&red);
        let names: Vec<&str> = tools.used_colors().iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["#ff0000", "#0000ff"]);
    }

    #[test]
    fn reset_restores_defaults_but_keeps_configured_default() {
        let mut tools = ToolState::new(20, MAX_BRUSH_SIZE);
        tools.choose_color("#abcdef").unwrap();
        tools.set_brush_size("3");
        tools.toggle_eraser();
        tools.record_use(&StrokeColor::parse("#abcdef").unwrap());

        tools.reset();
        assert!(tools.color().is_none());
        assert!(!tools.is_chosen());
        assert!(!tools.eraser());
        assert!(tools.used_colors().is_empty());
        assert_eq!(tools.brush_size(), 20);
    }
}
