//! The editor session.
//!
//! `Editor` owns the two raster layers (image beneath, drawing on top) and
//! all session state. Every host interaction goes through it:
//!
//! | Host action            | Editor call                          |
//! |------------------------|--------------------------------------|
//! | page layout / resize   | `resize(logical, dpr)`               |
//! | pick image             | `begin_load` … `finish_load`         |
//! | color / size / eraser  | `choose_color`, `set_brush_size`, `toggle_eraser` |
//! | pointer input          | `handle_pointer`                     |
//! | save                   | `export` … `complete_save`           |
//! | reset                  | `reset`                              |

use crate::config::EditorConfig;
use crate::draw::{DrawEffect, DrawLayer};
use crate::export::{ExportPayload, SaveError, png_data_uri};
use crate::image::ImageLayer;
use crate::input::PointerEvent;
use crate::notice::Notice;
use crate::tools::{GateError, ToolState};
use cb_core::{
    ColorError, DevicePixelRatio, Rect, Size, StrokeColor, SurfaceSize, backing_size,
    logical_transform,
};
use cb_render::{Bitmap, PixmapSurface, RasterSurface, RenderError};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What the host must do after a pointer event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerResponse {
    /// Capture this pointer id on the drawing surface.
    pub capture: Option<i32>,
    /// Release capture for this pointer id (ignore failures).
    pub release: Option<i32>,
    /// Suppress the platform default (touch scrolling).
    pub prevent_default: bool,
    /// The drawing surface changed and should be presented.
    pub painted: bool,
    /// Logical area the painted segments cover.
    pub dirty: Option<Rect>,
    /// The stroke was refused; a notice has been queued.
    pub rejected: Option<GateError>,
}

pub struct Editor<S: RasterSurface = PixmapSurface> {
    config: EditorConfig,
    /// Logical (CSS pixel) size of the workspace.
    workspace: Size,
    dpr: DevicePixelRatio,
    draw_surface: S,
    image_surface: S,
    tools: ToolState,
    draw: DrawLayer,
    image: ImageLayer,
    notices: Vec<Notice>,
}

impl<S: RasterSurface> Editor<S> {
    /// A fresh session with zero-sized layers. Call `resize` once the
    /// workspace has been laid out.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        let tools = ToolState::new(config.default_brush_size, config.max_brush_size);
        Ok(Self {
            config,
            workspace: Size::ZERO,
            dpr: DevicePixelRatio::ONE,
            draw_surface: S::blank(SurfaceSize::default())?,
            image_surface: S::blank(SurfaceSize::default())?,
            tools,
            draw: DrawLayer::new(),
            image: ImageLayer::new(),
            notices: Vec::new(),
        })
    }

    // ─── Surface sizing ──────────────────────────────────────────────────

    /// Apply a new workspace size and device pixel ratio.
    ///
    /// Both layers are resized together. The image layer is redrawn from
    /// the retained bitmap before returning; strokes on the drawing layer
    /// are lost if the backing size changed. On error nothing changes.
    pub fn resize(&mut self, logical: Size, dpr: f64) -> Result<(), EditorError> {
        let dpr = DevicePixelRatio::new(dpr);
        let target = backing_size(logical, dpr);
        if target != self.draw_surface.size() || target != self.image_surface.size() {
            // Allocate both before swapping so a refused size changes nothing.
            let draw_surface = S::blank(target)?;
            let image_surface = S::blank(target)?;
            self.draw_surface = draw_surface;
            self.image_surface = image_surface;
        }
        self.workspace = logical;
        self.dpr = dpr;
        self.layout()?;
        Ok(())
    }

    fn layout(&mut self) -> Result<(), RenderError> {
        let target = backing_size(self.workspace, self.dpr);
        let transform = logical_transform(self.dpr);
        for surface in [&mut self.draw_surface, &mut self.image_surface] {
            surface.resize(target)?;
            surface.set_transform(transform);
        }
        if let Some(bitmap) = self.image.current() {
            self.image_surface.draw_image_fitted(bitmap, self.workspace);
        }
        Ok(())
    }

    // ─── Image layer ─────────────────────────────────────────────────────

    /// Ask to load a new image. Returns `false` (and queues a notice) if an
    /// image is locked in. The decode itself happens in the host.
    pub fn begin_load(&mut self) -> bool {
        match self.image.begin_load() {
            Ok(()) => true,
            Err(locked) => {
                log::warn!("load refused: {locked}");
                self.notices.push(locked.into());
                false
            }
        }
    }

    /// Complete an accepted load with the host's fetch/decode result.
    ///
    /// On success the bitmap becomes current and locked, the layers go
    /// through a full layout pass and the image is fitted. On failure a
    /// notice is queued and nothing changes.
    pub fn finish_load<E: fmt::Display>(&mut self, decoded: Result<Bitmap, E>) -> bool {
        let bitmap = match decoded {
            Ok(bitmap) => bitmap,
            Err(err) => {
                log::warn!("image load failed: {err}");
                self.notices.push(Notice::LoadFailed(err.to_string()));
                return false;
            }
        };
        let natural = bitmap.natural_size();
        self.image.finish_load(bitmap);
        if let Err(err) = self.layout() {
            log::error!("layout after image load failed: {err}");
            self.notices.push(Notice::LoadFailed(err.to_string()));
            return false;
        }
        log::info!(
            "image loaded ({}x{}) into {}x{} workspace",
            natural.width,
            natural.height,
            self.workspace.width,
            self.workspace.height
        );
        true
    }

    /// Synchronous load from encoded bytes: lock check, decode, complete.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> bool {
        self.begin_load() && self.finish_load(Bitmap::decode(bytes))
    }

    // ─── Tool state ──────────────────────────────────────────────────────

    /// Select a pigment color. Empty values are ignored; unparsable ones
    /// queue a notice. Returns whether the color was applied.
    pub fn choose_color(&mut self, value: &str) -> bool {
        match self.tools.choose_color(value) {
            Ok(color) => {
                log::debug!("color selected: {color}");
                true
            }
            Err(ColorError::Empty) => false,
            Err(err) => {
                log::warn!("{err}");
                self.notices.push(err.into());
                false
            }
        }
    }

    /// Flip the eraser; returns the new state.
    pub fn toggle_eraser(&mut self) -> bool {
        let on = self.tools.toggle_eraser();
        log::debug!("eraser {}", if on { "on" } else { "off" });
        on
    }

    /// Apply a size control value; returns the width actually in effect.
    pub fn set_brush_size(&mut self, value: &str) -> u32 {
        self.tools.set_brush_size(value)
    }

    // ─── Draw layer ──────────────────────────────────────────────────────

    /// Feed one pointer event through the stroke state machine and apply
    /// its effects to the drawing surface.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerResponse {
        let effects = self
            .draw
            .handle(event, &self.tools, self.image.is_loaded());
        let mut response = PointerResponse::default();
        for effect in effects {
            match effect {
                DrawEffect::Rejected(gate) => {
                    response.rejected = Some(gate);
                    self.notices.push(gate.into());
                }
                DrawEffect::Capture(id) => response.capture = Some(id),
                DrawEffect::Release(id) => response.release = Some(id),
                DrawEffect::PreventDefault => response.prevent_default = true,
                DrawEffect::Paint(segment) => {
                    self.draw_surface.draw_stroke(&segment);
                    let bounds = segment.bounds();
                    response.dirty = Some(response.dirty.map_or(bounds, |d| d.union(bounds)));
                    if let Some(color) = segment.mode.pigment() {
                        self.tools.record_use(color);
                    }
                    response.painted = true;
                }
            }
        }
        response
    }

    // ─── Compositor / exporter ───────────────────────────────────────────

    /// Flatten both layers (image beneath strokes) at the drawing layer's
    /// backing size and encode the result as PNG.
    pub fn composite_png(&self) -> Result<Vec<u8>, EditorError> {
        let mut flat = S::blank(self.draw_surface.size())?;
        flat.draw_surface(&self.image_surface);
        flat.draw_surface(&self.draw_surface);
        let png = flat.to_encoded_bytes()?;
        log::debug!(
            "flattened {}x{} composite ({} bytes png)",
            flat.size().width,
            flat.size().height,
            png.len()
        );
        Ok(png)
    }

    /// Package the composite with the used colors.
    pub fn export(&self) -> Result<ExportPayload, EditorError> {
        let png = self.composite_png()?;
        Ok(ExportPayload {
            used_colors: self
                .tools
                .used_colors()
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            preview: png_data_uri(&png),
        })
    }

    /// Apply the sink's verdict. Success notifies and resets the session;
    /// failure notifies and leaves everything as it was so the user can retry.
    pub fn complete_save(&mut self, outcome: Result<(), SaveError>) -> bool {
        match outcome {
            Ok(()) => {
                log::info!("drawing saved");
                self.notices.push(Notice::Saved);
                self.reset();
                true
            }
            Err(err) => {
                log::warn!("save failed: {err}");
                self.notices.push(err.into());
                false
            }
        }
    }

    /// Export, hand the payload to `submit`, and apply its outcome.
    ///
    /// If the composite cannot be produced, a notice is queued, the error
    /// is returned and `submit` is never called.
    pub fn save_with<F>(&mut self, submit: F) -> Result<bool, EditorError>
    where
        F: FnOnce(&ExportPayload) -> Result<(), SaveError>,
    {
        let payload = match self.export() {
            Ok(payload) => payload,
            Err(err) => {
                log::error!("export failed: {err}");
                self.notices.push(Notice::ExportFailed(err.to_string()));
                return Err(err);
            }
        };
        Ok(self.complete_save(submit(&payload)))
    }

    // ─── Reset ───────────────────────────────────────────────────────────

    /// Return to the initial empty session. Layer sizes are kept.
    pub fn reset(&mut self) {
        self.draw_surface.clear();
        self.image_surface.clear();
        self.draw.reset();
        self.tools.reset();
        self.image.reset();
        log::debug!("session reset");
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn workspace(&self) -> Size {
        self.workspace
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr.get()
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn used_colors(&self) -> &[StrokeColor] {
        self.tools.used_colors()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_loaded()
    }

    pub fn current_image(&self) -> Option<&Bitmap> {
        self.image.current()
    }

    pub fn is_locked(&self) -> bool {
        self.image.is_locked()
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_drawing()
    }

    pub fn draw_surface(&self) -> &S {
        &self.draw_surface
    }

    pub fn image_surface(&self) -> &S {
        &self.image_surface
    }

    /// Notices queued since the last drain, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
