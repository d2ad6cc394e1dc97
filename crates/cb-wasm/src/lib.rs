//! WASM bridge for the coloring book page.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM
//! (file picker, color input, size slider, buttons) and forwards every
//! interaction to a [`ColoringBook`]; this crate keeps the two `<canvas>`
//! layers in sync with the editor and surfaces notices as alerts.

mod console;
mod net;
mod present;

use cb_core::{DevicePixelRatio, Rect, Size, device_region};
use cb_editor::{Editor, EditorConfig, Notice, PointerEvent, PointerPhase};
use cb_render::{Bitmap, RasterSurface};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlCanvasElement};

struct Session {
    editor: RefCell<Editor>,
    stack: Element,
    draw_canvas: HtmlCanvasElement,
    image_canvas: HtmlCanvasElement,
    saving: Cell<bool>,
}

/// The page-facing controller.
///
/// `stack` is the workspace container both canvases are stacked in; its
/// bounding box defines the logical drawing area.
#[wasm_bindgen]
pub struct ColoringBook {
    session: Rc<Session>,
}

#[wasm_bindgen]
impl ColoringBook {
    /// `config` is an optional JSON object with any of `default_brush_size`,
    /// `endpoint` and `request_timeout_ms`. `log_level` is a `log` level name.
    #[wasm_bindgen(constructor)]
    pub fn new(
        stack: Element,
        draw_canvas: HtmlCanvasElement,
        image_canvas: HtmlCanvasElement,
        config: Option<String>,
        log_level: Option<String>,
    ) -> Result<ColoringBook, JsValue> {
        console::panic_hook_setup();
        console::init_logging(console::level_from_name(log_level.as_deref()));

        let config = match config.as_deref() {
            Some(text) if !text.trim().is_empty() => EditorConfig::from_json(text)
                .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?,
            _ => EditorConfig::default(),
        };
        log::debug!("starting with {config:?}");
        let editor = Editor::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let book = Self {
            session: Rc::new(Session {
                editor: RefCell::new(editor),
                stack,
                draw_canvas,
                image_canvas,
                saving: Cell::new(false),
            }),
        };
        book.session.layout()?;
        Ok(book)
    }

    // ─── Layout ──────────────────────────────────────────────────────────

    /// Re-read the workspace size and device pixel ratio, resize both
    /// layers and repaint. Call on startup and on every window resize.
    pub fn layout(&self) -> Result<(), JsValue> {
        self.session.layout()
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Forward a `pointerdown`/`pointermove`/`pointerup`/`pointercancel`/
    /// `pointerleave` event from the drawing canvas.
    pub fn handle_pointer(&self, event: &web_sys::PointerEvent) {
        let Some(phase) = PointerPhase::from_event_type(&event.type_()) else {
            return;
        };
        let pointer = PointerEvent::new(
            event.pointer_id(),
            f64::from(event.offset_x()),
            f64::from(event.offset_y()),
            phase,
        );
        let response = self.session.editor.borrow_mut().handle_pointer(&pointer);

        let canvas = &self.session.draw_canvas;
        if let Some(id) = response.capture {
            if let Err(err) = canvas.set_pointer_capture(id) {
                log::debug!("pointer capture failed: {err:?}");
            }
        }
        if let Some(id) = response.release {
            let _ = canvas.release_pointer_capture(id);
        }
        if response.prevent_default {
            event.prevent_default();
        }
        if let Some(dirty) = response.dirty {
            self.session.present_draw(dirty);
        }
        self.session.flush_notices();
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Apply the color input's value. Returns whether it took effect.
    pub fn choose_color(&self, value: &str) -> bool {
        let applied = self.session.editor.borrow_mut().choose_color(value);
        self.session.flush_notices();
        applied
    }

    /// Returns the new eraser state.
    pub fn toggle_eraser(&self) -> bool {
        self.session.editor.borrow_mut().toggle_eraser()
    }

    /// Apply the size slider's value. Returns the width in effect.
    pub fn set_brush_size(&self, value: &str) -> u32 {
        self.session.editor.borrow_mut().set_brush_size(value)
    }

    pub fn brush_size(&self) -> u32 {
        self.session.editor.borrow().tools().brush_size()
    }

    /// Value the size control shows after a reset.
    pub fn default_brush_size(&self) -> u32 {
        self.session.editor.borrow().tools().default_brush_size()
    }

    /// Upper bound for the size control.
    pub fn max_brush_size(&self) -> u32 {
        self.session.editor.borrow().tools().max_brush_size()
    }

    pub fn eraser_active(&self) -> bool {
        self.session.editor.borrow().tools().eraser()
    }

    pub fn current_color(&self) -> Option<String> {
        let editor = self.session.editor.borrow();
        editor.tools().color().map(|c| c.as_str().to_string())
    }

    /// Used colors in first-use order, as a JSON array of strings.
    pub fn used_colors_json(&self) -> String {
        let editor = self.session.editor.borrow();
        let colors: Vec<&str> = editor.used_colors().iter().map(|c| c.as_str()).collect();
        serde_json::to_string(&colors).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn has_image(&self) -> bool {
        self.session.editor.borrow().has_image()
    }

    // ─── Image ───────────────────────────────────────────────────────────

    /// Load the picture at `src` (a URL or a `data:` URI from the picker).
    /// Refused with an alert while an image is locked in.
    pub fn load_image(&self, src: String) {
        if !self.session.editor.borrow_mut().begin_load() {
            self.session.flush_notices();
            return;
        }
        let session = Rc::clone(&self.session);
        spawn_local(async move {
            let decoded = match net::fetch_bytes(&src).await {
                Ok(bytes) => Bitmap::decode(&bytes).map_err(|e| e.to_string()),
                Err(err) => Err(err),
            };
            let loaded = session.editor.borrow_mut().finish_load(decoded);
            if loaded {
                // The container may have changed since the last layout call.
                if let Err(err) = session.layout() {
                    log::error!("layout after image load failed: {err:?}");
                    session.present_all();
                }
            }
            session.flush_notices();
        });
    }

    // ─── Save & reset ────────────────────────────────────────────────────

    /// Export the composite and post it. Success resets the page; failure
    /// keeps everything so the user can retry.
    pub fn save(&self) {
        if self.session.saving.get() {
            log::warn!("save already in flight");
            return;
        }
        let (body, endpoint, timeout) = {
            let editor = self.session.editor.borrow();
            let body = editor
                .export()
                .map_err(|e| e.to_string())
                .and_then(|payload| payload.to_json().map_err(|e| e.to_string()));
            let config = editor.config();
            (body, config.endpoint.clone(), config.request_timeout())
        };
        let body = match body {
            Ok(body) => body,
            Err(reason) => {
                log::error!("export failed: {reason}");
                alert(&Notice::ExportFailed(reason).to_string());
                return;
            }
        };

        self.session.saving.set(true);
        let session = Rc::clone(&self.session);
        spawn_local(async move {
            let outcome = net::post_json(&endpoint, body, timeout).await;
            let saved = session.editor.borrow_mut().complete_save(outcome);
            session.saving.set(false);
            if saved {
                session.present_all();
            }
            session.flush_notices();
        });
    }

    /// Clear both layers and every piece of session state.
    pub fn reset(&self) {
        self.session.editor.borrow_mut().reset();
        self.session.present_all();
    }
}

impl Session {
    /// Measure the workspace container and the device pixel ratio, resize
    /// both layers and repaint.
    fn layout(&self) -> Result<(), JsValue> {
        let rect = self.stack.get_bounding_client_rect();
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        self.editor
            .borrow_mut()
            .resize(Size::new(rect.width(), rect.height()), dpr)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.present_all();
        Ok(())
    }

    /// Upload the part of the drawing layer covering `dirty` (logical px).
    fn present_draw(&self, dirty: Rect) {
        let editor = self.editor.borrow();
        let surface = editor.draw_surface();
        let dpr = DevicePixelRatio::new(editor.device_pixel_ratio());
        let Some(region) = device_region(dirty, dpr, surface.size()) else {
            return;
        };
        if let Err(err) = present::present_region(&self.draw_canvas, surface, region) {
            log::error!("presenting drawing layer failed: {err:?}");
        }
    }

    fn present_all(&self) {
        let editor = self.editor.borrow();
        for (canvas, surface) in [
            (&self.image_canvas, editor.image_surface()),
            (&self.draw_canvas, editor.draw_surface()),
        ] {
            if let Err(err) = present::present(canvas, surface) {
                log::error!("presenting layer failed: {err:?}");
            }
        }
    }

    /// Show queued notices. The editor borrow is released before alerting.
    fn flush_notices(&self) {
        let notices = self.editor.borrow_mut().take_notices();
        for notice in notices {
            alert(&notice.to_string());
        }
    }
}

fn alert(message: &str) {
    if message.is_empty() {
        return;
    }
    let Some(window) = web_sys::window() else {
        log::warn!("{message}");
        return;
    };
    if window.alert_with_message(message).is_err() {
        log::warn!("{message}");
    }
}
