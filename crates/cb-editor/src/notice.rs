//! User-facing notifications queued by the editor.
//!
//! The host decides how to show them (a blocking alert in the browser, a log
//! line in the CLI). `Display` gives a neutral default wording.

use crate::export::SaveError;
use crate::image::ImageLocked;
use crate::tools::GateError;
use cb_core::ColorError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A stroke was refused at pointer-down.
    Gate(GateError),
    /// A load was requested while an image is locked in.
    ImageLocked,
    /// The image resource could not be fetched or decoded.
    LoadFailed(String),
    /// The color picker emitted something that is not a color.
    InvalidColor(String),
    /// The composite could not be produced.
    ExportFailed(String),
    Saved,
    SaveFailed(SaveError),
}

impl From<GateError> for Notice {
    fn from(err: GateError) -> Self {
        Self::Gate(err)
    }
}

impl From<ImageLocked> for Notice {
    fn from(_: ImageLocked) -> Self {
        Self::ImageLocked
    }
}

impl From<SaveError> for Notice {
    fn from(err: SaveError) -> Self {
        Self::SaveFailed(err)
    }
}

impl From<ColorError> for Notice {
    fn from(err: ColorError) -> Self {
        Self::InvalidColor(err.to_string())
    }
}

impl Notice {
    /// Success notices are informational; everything else is a warning.
    pub fn is_warning(&self) -> bool {
        !matches!(self, Self::Saved)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gate(gate) => {
                let mut msg = gate.to_string();
                if let Some(first) = msg.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                write!(f, "{msg}.")
            }
            Self::ImageLocked => write!(
                f,
                "An image is already loaded. Save or reset the canvas to load another."
            ),
            Self::LoadFailed(reason) => write!(f, "Could not load the image ({reason})."),
            Self::InvalidColor(reason) => write!(f, "Invalid color: {reason}."),
            Self::ExportFailed(reason) => write!(f, "Could not prepare the drawing ({reason})."),
            Self::Saved => write!(f, "Saved successfully."),
            Self::SaveFailed(SaveError::Status(_)) => write!(f, "Error while saving."),
            Self::SaveFailed(err) => write!(f, "Could not save: {err}."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_notice_reads_as_a_sentence() {
        let notice = Notice::from(GateError::NoImage);
        assert_eq!(notice.to_string(), "Select an image before drawing.");
        assert!(notice.is_warning());
    }

    #[test]
    fn saved_is_not_a_warning() {
        assert!(!Notice::Saved.is_warning());
        assert!(Notice::SaveFailed(SaveError::Status(500)).is_warning());
    }
}
