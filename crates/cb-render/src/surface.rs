use crate::bitmap::Bitmap;
use cb_core::{StrokeSegment, SurfaceSize};
use kurbo::{Affine, Size};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid raster size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("surface has no pixels to encode")]
    EmptySurface,
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("could not encode raster: {0}")]
    Encode(String),
}

/// A mutable, alpha-capable raster layer.
///
/// Drawing commands take logical-pixel coordinates; the installed transform
/// maps them onto the backing store. Compositing (`draw_surface`) works in
/// device pixels and ignores the transform.
pub trait RasterSurface: Sized {
    /// A transparent surface of the given backing-store size.
    fn blank(size: SurfaceSize) -> Result<Self, RenderError>;

    fn size(&self) -> SurfaceSize;

    /// Reallocate the backing store if `size` differs from the current one.
    /// Reallocation discards all content; an unchanged size keeps it.
    fn resize(&mut self, size: SurfaceSize) -> Result<(), RenderError>;

    /// Install the logical → device transform for subsequent drawing.
    fn set_transform(&mut self, transform: Affine);

    /// Make every pixel transparent.
    fn clear(&mut self);

    /// Rasterize one segment with round caps and joins.
    fn draw_stroke(&mut self, segment: &StrokeSegment);

    /// Clear, then draw `image` scaled to fit and centered in `workspace`
    /// (logical size) with high-quality filtering.
    fn draw_image_fitted(&mut self, image: &Bitmap, workspace: Size);

    /// Source-over blit of `other` at the device-pixel origin.
    fn draw_surface(&mut self, other: &Self);

    /// Lossless PNG encoding of the backing store.
    fn to_encoded_bytes(&self) -> Result<Vec<u8>, RenderError>;
}
