//! Surface sizing.
//!
//! Both raster layers share the workspace's logical (CSS pixel) size. Their
//! backing stores are scaled by the device pixel ratio, and every drawing
//! command is issued in logical pixels through a uniform scale transform.

use kurbo::{Affine, Rect, Size};

/// Display device pixel ratio, never below 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePixelRatio(f64);

impl DevicePixelRatio {
    pub const ONE: Self = Self(1.0);

    /// Clamp a raw ratio reported by the platform. Missing or garbage
    /// values (NaN, infinities, zero) fall back to 1.
    pub fn new(raw: f64) -> Self {
        if raw.is_finite() && raw > 1.0 {
            Self(raw)
        } else {
            Self::ONE
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for DevicePixelRatio {
    fn default() -> Self {
        Self::ONE
    }
}

/// Backing-store dimensions of a raster surface, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A surface with no pixels on either axis cannot hold a raster.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Compute backing-store dimensions for a workspace of the given logical size.
///
/// Each axis is rounded independently: `round(logical × ratio)`.
pub fn backing_size(logical: Size, dpr: DevicePixelRatio) -> SurfaceSize {
    SurfaceSize {
        width: scale_axis(logical.width, dpr.get()),
        height: scale_axis(logical.height, dpr.get()),
    }
}

/// Transform that maps logical pixels onto the backing store.
pub fn logical_transform(dpr: DevicePixelRatio) -> Affine {
    Affine::scale(dpr.get())
}

/// A rectangle of whole device pixels inside a backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Device pixels touched by a logical rectangle, expanded outward to whole
/// pixels and clipped to `bounds`. `None` if nothing is left.
pub fn device_region(
    logical: Rect,
    dpr: DevicePixelRatio,
    bounds: SurfaceSize,
) -> Option<PixelRegion> {
    let scaled = logical.scale_from_origin(dpr.get()).expand();
    let clip = |v: f64, max: u32| -> u32 {
        if v.is_nan() {
            0
        } else {
            v.clamp(0.0, f64::from(max)) as u32
        }
    };
    let x0 = clip(scaled.x0, bounds.width);
    let y0 = clip(scaled.y0, bounds.height);
    let x1 = clip(scaled.x1, bounds.width);
    let y1 = clip(scaled.y1, bounds.height);
    (x1 > x0 && y1 > y0).then_some(PixelRegion {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

fn scale_axis(logical: f64, ratio: f64) -> u32 {
    if !logical.is_finite() || logical <= 0.0 {
        return 0;
    }
    let scaled = (logical * ratio).round();
    if scaled >= u32::MAX as f64 {
        u32::MAX
    } else {
        scaled as u32
    }
}
