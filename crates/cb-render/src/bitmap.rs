//! Decoded source images.

use crate::surface::RenderError;
use kurbo::Size;
use tiny_skia::{ColorU8, Pixmap};

/// A decoded background image, stored premultiplied and ready to blit.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pixmap: Pixmap,
}

impl Bitmap {
    /// Decode any format the `image` crate was built with (PNG, JPEG, GIF,
    /// WebP, BMP). Animated formats contribute their first frame.
    pub fn decode(bytes: &[u8]) -> Result<Self, RenderError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {width}x{height} bitmap from {} bytes", bytes.len());
        Self::from_rgba8(width, height, rgba.as_raw())
    }

    /// Build from straight (non-premultiplied) RGBA8 rows.
    pub fn from_rgba8(width: u32, height: u32, pixels: &[u8]) -> Result<Self, RenderError> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidSize { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(pixels.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(Self { pixmap })
    }

    /// Intrinsic dimensions, used for scale-to-fit.
    pub fn natural_size(&self) -> Size {
        Size::new(self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    /// Straight RGBA8 of one pixel, `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.pixmap.width() || y >= self.pixmap.height() {
            return None;
        }
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        let err = Bitmap::from_rgba8(2, 2, &[0; 12]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidSize { width: 2, height: 2 }));
    }

    #[test]
    fn rejects_zero_size() {
        assert!(Bitmap::from_rgba8(0, 4, &[]).is_err());
    }

    #[test]
    fn decodes_png_bytes() {
        let mut pixmap = Pixmap::new(3, 5).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(10, 200, 30, 255));
        let png = pixmap.encode_png().unwrap();

        let bitmap = Bitmap::decode(&png).unwrap();
        assert_eq!(bitmap.natural_size(), Size::new(3.0, 5.0));
        assert_eq!(bitmap.pixel(1, 1), Some([10, 200, 30, 255]));
        assert_eq!(bitmap.pixel(3, 0), None);
        assert_eq!(bitmap.pixel(0, 5), None);
        assert_eq!(bitmap.pixel(2, 4), Some([10, 200, 30, 255]));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = Bitmap::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, RenderError::Decode(_)));
    }
}
