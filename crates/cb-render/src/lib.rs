//! Raster surfaces for the two workspace layers.
//!
//! `RasterSurface` is the seam between the editor and a 2D backend.
//! `PixmapSurface` is the CPU implementation on top of `tiny-skia`.

pub mod bitmap;
pub mod paint;
pub mod surface;

pub use bitmap::Bitmap;
pub use paint::PixmapSurface;
pub use surface::{RasterSurface, RenderError};
