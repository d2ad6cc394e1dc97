//! Editor session for the coloring book.
//!
//! Owns both raster layers and every piece of mutable session state. Hosts
//! (the wasm bridge, the CLI) feed it pointer events and control changes and
//! drain the notices it queues for the user.

pub mod config;
pub mod draw;
pub mod editor;
pub mod export;
pub mod image;
pub mod input;
pub mod notice;
pub mod tools;

pub use config::EditorConfig;
pub use editor::{Editor, EditorError, PointerResponse};
pub use export::{ExportPayload, SaveError};
pub use input::{PointerEvent, PointerPhase};
pub use notice::Notice;
pub use tools::{GateError, ToolState};
