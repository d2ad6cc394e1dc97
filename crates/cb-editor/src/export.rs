//! Export wire format and save outcomes.
//!
//! The sink receives one JSON object with exactly two fields:
//! `colores_utilizados` (used colors, first-use order) and `vista_previa`
//! (the flattened composite as a PNG data URI).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Request body sent to the save endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPayload {
    #[serde(rename = "colores_utilizados")]
    pub used_colors: Vec<String>,
    #[serde(rename = "vista_previa")]
    pub preview: String,
}

impl ExportPayload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Why the sink did not accept a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("server rejected the save with status {0}")]
    Status(u16),
    #[error("network error while saving: {0}")]
    Transport(String),
    #[error("save request timed out after {0:?}")]
    Timeout(Duration),
}

/// Classify an HTTP status: any 2xx counts as saved.
pub fn check_status(status: u16) -> Result<(), SaveError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(SaveError::Status(status))
    }
}

/// Wrap encoded PNG bytes as a `data:` URI.
pub fn png_data_uri(png: &[u8]) -> String {
    let mut uri = String::with_capacity(PNG_DATA_URI_PREFIX.len() + png.len().div_ceil(3) * 4);
    uri.push_str(PNG_DATA_URI_PREFIX);
    STANDARD.encode_string(png, &mut uri);
    uri
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_uses_wire_field_names() {
        let payload = ExportPayload {
            used_colors: vec!["#00ff00".to_string()],
            preview: "data:image/png;base64,AAAA".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "colores_utilizados": ["#00ff00"],
                "vista_previa": "data:image/png;base64,AAAA",
            })
        );
    }

    #[test]
    fn data_uri_is_prefixed_base64() {
        assert_eq!(png_data_uri(b"abc"), "data:image/png;base64,YWJj");
        assert_eq!(png_data_uri(b""), PNG_DATA_URI_PREFIX);
    }

    #[test]
    fn only_2xx_counts_as_saved() {
        assert_eq!(check_status(200), Ok(()));
        assert_eq!(check_status(204), Ok(()));
        assert_eq!(check_status(302), Err(SaveError::Status(302)));
        assert_eq!(check_status(500), Err(SaveError::Status(500)));
    }
}
