//! Editor configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields a working editor.

use crate::tools::{DEFAULT_BRUSH_SIZE, MAX_BRUSH_SIZE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Relative endpoint the coloring page posts to.
pub const DEFAULT_ENDPOINT: &str = "guardar_coloreo.php";

/// Save request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Brush width in logical pixels at startup and after reset.
    pub default_brush_size: u32,
    /// Upper bound for the size control.
    pub max_brush_size: u32,
    /// Where `save` posts the export payload.
    pub endpoint: String,
    pub request_timeout_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_brush_size: DEFAULT_BRUSH_SIZE,
            max_brush_size: MAX_BRUSH_SIZE,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl EditorConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
