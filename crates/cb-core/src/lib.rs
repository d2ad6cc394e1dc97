pub mod color;
pub mod fit;
pub mod sizing;
pub mod stroke;

pub use color::{ColorError, StrokeColor};
pub use fit::fit_rect;
pub use sizing::{
    DevicePixelRatio, PixelRegion, SurfaceSize, backing_size, device_region, logical_transform,
};
pub use stroke::{StrokeMode, StrokeSegment};

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Affine, Point, Rect, Size};
