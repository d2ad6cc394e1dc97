//! Session scripts: a JSON list of user actions replayed against an editor.
//!
//! ```json
//! [
//!   { "op": "color", "value": "#00ff00" },
//!   { "op": "brush", "value": "8" },
//!   { "op": "stroke", "points": [[10, 10], [50, 50]] },
//!   { "op": "eraser" },
//!   { "op": "resize", "width": 640, "height": 480, "dpr": 2 },
//!   { "op": "load", "path": "other.png" },
//!   { "op": "reset" }
//! ]
//! ```

use anyhow::{Context, Result, bail};
use cb_core::Size;
use cb_editor::{Editor, PointerEvent};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SCRIPT_POINTER_ID: i32 = 1;

fn default_dpr() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    /// Color picker change.
    Color { value: String },
    /// Size slider change (raw control value).
    Brush { value: String },
    /// Eraser button press.
    Eraser,
    /// One pointer stroke: down at the first point, a move per further
    /// point, up at the last.
    Stroke {
        points: Vec<[f64; 2]>,
        #[serde(default)]
        pointer_id: Option<i32>,
    },
    /// Workspace resize.
    Resize {
        width: f64,
        height: f64,
        #[serde(default = "default_dpr")]
        dpr: f64,
    },
    /// Pick another image file.
    Load { path: PathBuf },
    /// Reset button press.
    Reset,
}

pub fn parse(text: &str) -> Result<Vec<Action>> {
    serde_json::from_str(text).context("invalid session script")
}

pub fn load(path: &Path) -> Result<Vec<Action>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    parse(&text)
}

/// Replay `actions` in order. Rejected user actions only queue notices;
/// errors are reserved for I/O and rendering failures.
pub fn apply(editor: &mut Editor, actions: &[Action]) -> Result<()> {
    for (index, action) in actions.iter().enumerate() {
        log::debug!("action {index}: {action:?}");
        match action {
            Action::Color { value } => {
                editor.choose_color(value);
            }
            Action::Brush { value } => {
                editor.set_brush_size(value);
            }
            Action::Eraser => {
                editor.toggle_eraser();
            }
            Action::Stroke { points, pointer_id } => {
                stroke(editor, points, pointer_id.unwrap_or(SCRIPT_POINTER_ID))
                    .with_context(|| format!("action {index}"))?;
            }
            Action::Resize { width, height, dpr } => {
                editor.resize(Size::new(*width, *height), *dpr)?;
            }
            Action::Load { path } => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading image {}", path.display()))?;
                editor.load_bytes(&bytes);
            }
            Action::Reset => editor.reset(),
        }
    }
    Ok(())
}

fn stroke(editor: &mut Editor, points: &[[f64; 2]], pointer_id: i32) -> Result<()> {
    let Some((&[x0, y0], rest)) = points.split_first() else {
        bail!("stroke needs at least one point");
    };
    editor.handle_pointer(&PointerEvent::down(pointer_id, x0, y0));
    for &[x, y] in rest {
        editor.handle_pointer(&PointerEvent::moved(pointer_id, x, y));
    }
    let [xn, yn] = points[points.len() - 1];
    editor.handle_pointer(&PointerEvent::up(pointer_id, xn, yn));
    Ok(())
}
