//! CPU raster surface backed by a `tiny-skia` pixmap.
//!
//! Pigment strokes use source-over blending; erasure uses destination-out
//! with an opaque source so covered pixels lose their alpha entirely.

use crate::bitmap::Bitmap;
use crate::surface::{RasterSurface, RenderError};
use cb_core::{PixelRegion, StrokeMode, StrokeSegment, SurfaceSize, fit_rect};
use kurbo::{Affine, Size};
use tiny_skia::{
    BlendMode, Color, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

/// A raster layer held in memory. Zero-sized surfaces own no pixmap.
#[derive(Debug, Clone)]
pub struct PixmapSurface {
    pixmap: Option<Pixmap>,
    size: SurfaceSize,
    transform: Transform,
}

impl PixmapSurface {
    /// Premultiplied RGBA8 bytes of the backing store (empty if zero-sized).
    pub fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map(Pixmap::data).unwrap_or(&[])
    }

    /// Straight RGBA8 bytes, suitable for `ImageData` or PNG writers.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let Some(pixmap) = &self.pixmap else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(pixmap.data().len());
        for px in pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Straight RGBA8 rows of one region, clipped to the surface.
    pub fn region_rgba8(&self, region: PixelRegion) -> Vec<u8> {
        let Some(pixmap) = &self.pixmap else {
            return Vec::new();
        };
        let (width, height) = (pixmap.width(), pixmap.height());
        let x0 = region.x.min(width);
        let x1 = region.x.saturating_add(region.width).min(width);
        let y0 = region.y.min(height);
        let y1 = region.y.saturating_add(region.height).min(height);

        let pixels = pixmap.pixels();
        let mut out = Vec::with_capacity(((x1 - x0) * (y1 - y0) * 4) as usize);
        for y in y0..y1 {
            let row = (y * width) as usize;
            for px in &pixels[row + x0 as usize..row + x1 as usize] {
                let c = px.demultiply();
                out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }
        out
    }

    /// Straight RGBA8 of one device pixel, `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixmap = self.pixmap.as_ref()?;
        if x >= pixmap.width() || y >= pixmap.height() {
            return None;
        }
        let c = pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixmap
            .as_ref()
            .is_none_or(|p| p.pixels().iter().all(|px| px.alpha() == 0))
    }

    fn allocate(size: SurfaceSize) -> Result<Option<Pixmap>, RenderError> {
        if size.is_empty() {
            return Ok(None);
        }
        Pixmap::new(size.width, size.height)
            .map(Some)
            .ok_or(RenderError::InvalidSize {
                width: size.width,
                height: size.height,
            })
    }
}

impl RasterSurface for PixmapSurface {
    fn blank(size: SurfaceSize) -> Result<Self, RenderError> {
        Ok(Self {
            pixmap: Self::allocate(size)?,
            size,
            transform: Transform::identity(),
        })
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) -> Result<(), RenderError> {
        if size == self.size {
            return Ok(());
        }
        log::debug!(
            "resizing surface {}x{} -> {}x{}",
            self.size.width,
            self.size.height,
            size.width,
            size.height
        );
        self.pixmap = Self::allocate(size)?;
        self.size = size;
        Ok(())
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = to_skia(transform);
    }

    fn clear(&mut self) {
        if let Some(pixmap) = &mut self.pixmap {
            pixmap.fill(Color::TRANSPARENT);
        }
    }

    fn draw_stroke(&mut self, segment: &StrokeSegment) {
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(segment.from.x as f32, segment.from.y as f32);
        pb.line_to(segment.to.x as f32, segment.to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };
        match &segment.mode {
            StrokeMode::Pigment(color) => {
                let [r, g, b, a] = color.rgba8();
                paint.set_color_rgba8(r, g, b, a);
                paint.blend_mode = BlendMode::SourceOver;
            }
            StrokeMode::Erase => {
                paint.set_color_rgba8(0, 0, 0, 255);
                paint.blend_mode = BlendMode::DestinationOut;
            }
        }

        let stroke = Stroke {
            width: segment.width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, self.transform, None);
    }

    fn draw_image_fitted(&mut self, image: &Bitmap, workspace: Size) {
        self.clear();
        let Some(pixmap) = &mut self.pixmap else {
            return;
        };
        let natural = image.natural_size();
        let Some(rect) = fit_rect(workspace, natural) else {
            return;
        };
        let transform = self
            .transform
            .pre_translate(rect.x0 as f32, rect.y0 as f32)
            .pre_scale(
                (rect.width() / natural.width) as f32,
                (rect.height() / natural.height) as f32,
            );
        let paint = PixmapPaint {
            quality: FilterQuality::Bicubic,
            ..PixmapPaint::default()
        };
        pixmap.draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, transform, None);
    }

    fn draw_surface(&mut self, other: &Self) {
        let (Some(dst), Some(src)) = (&mut self.pixmap, &other.pixmap) else {
            return;
        };
        dst.draw_pixmap(
            0,
            0,
            src.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn to_encoded_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let pixmap = self.pixmap.as_ref().ok_or(RenderError::EmptySurface)?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

fn to_skia(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::{DevicePixelRatio, StrokeColor, logical_transform};
    use kurbo::Point;
    use pretty_assertions::assert_eq;

    fn surface(w: u32, h: u32, dpr: f64) -> PixmapSurface {
        let mut s = PixmapSurface::blank(SurfaceSize::new(w, h)).unwrap();
        s.set_transform(logical_transform(DevicePixelRatio::new(dpr)));
        s
    }

    fn pigment(css: &str) -> StrokeMode {
        StrokeMode::Pigment(StrokeColor::parse(css).unwrap())
    }

    fn assert_near(actual: Option<[u8; 4]>, expected: [u8; 4]) {
        let actual = actual.expect("pixel in bounds");
        for (a, e) in actual.iter().zip(expected) {
            assert!(a.abs_diff(e) <= 2, "expected ~{expected:?}, got {actual:?}");
        }
    }

    fn solid_bitmap(w: u32, h: u32, rgba: [u8; 4]) -> Bitmap {
        let pixels: Vec<u8> = rgba.iter().copied().cycle().take((w * h * 4) as usize).collect();
        Bitmap::from_rgba8(w, h, &pixels).unwrap()
    }

    #[test]
    fn pigment_stroke_paints_along_segment() {
        let mut s = surface(64, 64, 1.0);
        let seg = StrokeSegment::new(
            Point::new(10.0, 10.0),
            Point::new(50.0, 50.0),
            8.0,
            pigment("#00ff00"),
        );
        s.draw_stroke(&seg);
        assert_eq!(s.pixel(30, 30), Some([0, 255, 0, 255]));
        assert_eq!(s.pixel(60, 2).map(|p| p[3]), Some(0));
    }

    #[test]
    fn round_caps_extend_past_endpoints() {
        let mut s = surface(64, 64, 1.0);
        let seg = StrokeSegment::new(
            Point::new(20.0, 32.0),
            Point::new(40.0, 32.0),
            12.0,
            pigment("#000000"),
        );
        s.draw_stroke(&seg);
        // Half the width (6px) beyond the endpoint along the axis is still covered.
        assert_eq!(s.pixel(16, 32).map(|p| p[3]), Some(255));
        assert_eq!(s.pixel(43, 32).map(|p| p[3]), Some(255));
    }

    #[test]
    fn strokes_use_logical_coordinates() {
        let mut s = surface(128, 128, 2.0);
        let seg = StrokeSegment::new(
            Point::new(10.0, 40.0),
            Point::new(50.0, 40.0),
            4.0,
            pigment("#ff0000"),
        );
        s.draw_stroke(&seg);
        // Logical (30, 40) lands on device (60, 80).
        assert_eq!(s.pixel(60, 80), Some([255, 0, 0, 255]));
        assert_eq!(s.pixel(30, 40).map(|p| p[3]), Some(0));
    }

    #[test]
    fn erase_removes_alpha() {
        let mut s = surface(32, 32, 1.0);
        s.draw_stroke(&StrokeSegment::new(
            Point::new(0.0, 16.0),
            Point::new(32.0, 16.0),
            10.0,
            pigment("#0000ff"),
        ));
        assert_eq!(s.pixel(16, 16), Some([0, 0, 255, 255]));

        s.draw_stroke(&StrokeSegment::new(
            Point::new(16.0, 0.0),
            Point::new(16.0, 32.0),
            6.0,
            StrokeMode::Erase,
        ));
        assert_eq!(s.pixel(16, 16).map(|p| p[3]), Some(0));
        assert_eq!(s.pixel(4, 16), Some([0, 0, 255, 255]));
    }

    #[test]
    fn resize_clears_only_when_size_changes() {
        let mut s = surface(16, 16, 1.0);
        s.draw_stroke(&StrokeSegment::new(
            Point::new(0.0, 8.0),
            Point::new(16.0, 8.0),
            4.0,
            pigment("#123456"),
        ));
        s.resize(SurfaceSize::new(16, 16)).unwrap();
        assert!(!s.is_blank());

        s.resize(SurfaceSize::new(20, 16)).unwrap();
        assert_eq!(s.size(), SurfaceSize::new(20, 16));
        assert!(s.is_blank());
    }

    #[test]
    fn zero_sized_surface_is_inert() {
        let mut s = surface(0, 0, 1.0);
        s.draw_stroke(&StrokeSegment::new(
            Point::ORIGIN,
            Point::new(5.0, 5.0),
            3.0,
            StrokeMode::Erase,
        ));
        assert!(s.is_blank());
        assert!(s.data().is_empty());
        assert!(matches!(s.to_encoded_bytes(), Err(RenderError::EmptySurface)));
    }

    #[test]
    fn fitted_image_is_centered() {
        let mut s = surface(100, 50, 1.0);
        let image = solid_bitmap(10, 10, [200, 0, 0, 255]);
        s.draw_image_fitted(&image, Size::new(100.0, 50.0));
        // 50x50 square centered horizontally: x in [25, 75).
        assert_near(s.pixel(50, 25), [200, 0, 0, 255]);
        assert_eq!(s.pixel(10, 25).map(|p| p[3]), Some(0));
        assert_eq!(s.pixel(90, 25).map(|p| p[3]), Some(0));
    }

    #[test]
    fn fitted_image_is_idempotent() {
        let mut s = surface(90, 60, 1.5);
        let pixels: Vec<u8> = (0..(7 * 3 * 4)).map(|i| (i * 37 % 256) as u8).collect();
        let image = Bitmap::from_rgba8(7, 3, &pixels).unwrap();
        s.draw_image_fitted(&image, Size::new(60.0, 40.0));
        let first = s.data().to_vec();
        s.draw_image_fitted(&image, Size::new(60.0, 40.0));
        assert_eq!(s.data(), first.as_slice());
    }

    #[test]
    fn composite_keeps_layer_order() {
        let mut image_layer = surface(8, 8, 1.0);
        image_layer.draw_image_fitted(
            &solid_bitmap(8, 8, [255, 255, 255, 255]),
            Size::new(8.0, 8.0),
        );
        let mut draw_layer = surface(8, 8, 1.0);
        draw_layer.draw_stroke(&StrokeSegment::new(
            Point::new(0.0, 4.0),
            Point::new(8.0, 4.0),
            2.0,
            pigment("#ff0000"),
        ));

        let mut flat = PixmapSurface::blank(draw_layer.size()).unwrap();
        flat.draw_surface(&image_layer);
        flat.draw_surface(&draw_layer);

        assert_eq!(flat.pixel(4, 4), Some([255, 0, 0, 255]));
        assert_near(flat.pixel(4, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn png_encoding_round_trips_through_decoder() {
        let mut s = surface(12, 9, 1.0);
        s.draw_stroke(&StrokeSegment::new(
            Point::new(0.0, 4.0),
            Point::new(12.0, 4.0),
            3.0,
            pigment("#336699"),
        ));
        let png = s.to_encoded_bytes().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = Bitmap::decode(&png).unwrap();
        assert_eq!(decoded.natural_size(), Size::new(12.0, 9.0));
    }

    #[test]
    fn pixel_outside_surface_is_none() {
        let s = surface(3, 5, 1.0);
        assert_eq!(s.pixel(2, 4), Some([0, 0, 0, 0]));
        assert_eq!(s.pixel(3, 0), None);
        assert_eq!(s.pixel(0, 5), None);
    }

    #[test]
    fn region_rows_match_full_export() {
        let mut s = surface(6, 4, 1.0);
        s.draw_stroke(&StrokeSegment::new(
            Point::new(0.0, 2.0),
            Point::new(6.0, 2.0),
            2.0,
            pigment("#3366cc"),
        ));
        let full = s.to_rgba8();
        let region = PixelRegion { x: 2, y: 1, width: 3, height: 2 };
        let part = s.region_rgba8(region);
        assert_eq!(part.len(), 3 * 2 * 4);
        for row in 0..2usize {
            let src = ((1 + row) * 6 + 2) * 4;
            assert_eq!(&part[row * 12..row * 12 + 12], &full[src..src + 12]);
        }

        let clipped = s.region_rgba8(PixelRegion { x: 5, y: 3, width: 4, height: 4 });
        assert_eq!(clipped.len(), 4);
    }

    #[test]
    fn straight_rgba_export_matches_size() {
        let s = surface(3, 2, 1.0);
        assert_eq!(s.to_rgba8().len(), 3 * 2 * 4);
    }
}
