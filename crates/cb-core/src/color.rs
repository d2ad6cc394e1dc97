//! Pigment colors as emitted by the color picker.
//!
//! The picker hands over CSS color strings. The string itself is what gets
//! reported back to the server, so it is kept verbatim next to the resolved
//! 8-bit RGBA used for rasterizing.

use peniko::color::{Srgb, parse_color};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color value is empty")]
    Empty,
    #[error("unrecognized color `{0}`")]
    Invalid(String),
}

/// A pigment color: the picker's original string plus its resolved RGBA.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StrokeColor {
    css: String,
    rgba: [u8; 4],
}

impl StrokeColor {
    /// Parse any CSS color string (`#rgb`, `#rrggbb`, `rgb(...)`, named colors).
    pub fn parse(value: &str) -> Result<Self, ColorError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ColorError::Empty);
        }
        let parsed = parse_color(trimmed).map_err(|_| ColorError::Invalid(trimmed.to_string()))?;
        let rgba = parsed.to_alpha_color::<Srgb>().to_rgba8();
        Ok(Self {
            css: trimmed.to_string(),
            rgba: [rgba.r, rgba.g, rgba.b, rgba.a],
        })
    }

    /// The color string exactly as the picker supplied it (trimmed).
    pub fn as_str(&self) -> &str {
        &self.css
    }

    pub fn rgba8(&self) -> [u8; 4] {
        self.rgba
    }
}

impl fmt::Display for StrokeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css)
    }
}
