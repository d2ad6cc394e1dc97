//! Blit raster layers into `<canvas>` elements.
//!
//! The canvas backing store always matches the layer's pixel size; the
//! page's CSS keeps its on-screen size at the workspace's logical size.

use cb_core::PixelRegion;
use cb_render::{PixmapSurface, RasterSurface};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

pub fn present(canvas: &HtmlCanvasElement, surface: &PixmapSurface) -> Result<(), JsValue> {
    let size = surface.size();
    if canvas.width() != size.width {
        canvas.set_width(size.width);
    }
    if canvas.height() != size.height {
        canvas.set_height(size.height);
    }
    if size.is_empty() {
        return Ok(());
    }

    let ctx = context_2d(canvas)?;
    let rgba = surface.to_rgba8();
    let image =
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(&rgba), size.width, size.height)?;
    ctx.put_image_data(&image, 0.0, 0.0)
}

/// Upload one region of a layer whose canvas already has the right size.
pub fn present_region(
    canvas: &HtmlCanvasElement,
    surface: &PixmapSurface,
    region: PixelRegion,
) -> Result<(), JsValue> {
    let size = surface.size();
    if canvas.width() != size.width || canvas.height() != size.height {
        return present(canvas, surface);
    }
    let ctx = context_2d(canvas)?;
    let rgba = surface.region_rgba8(region);
    let image =
        ImageData::new_with_u8_clamped_array_and_sh(Clamped(&rgba), region.width, region.height)?;
    ctx.put_image_data(&image, f64::from(region.x), f64::from(region.y))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| JsValue::from_str("2d context has an unexpected type"))
}
