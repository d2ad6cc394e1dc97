//! Proportional scale-to-fit placement of a bitmap inside the workspace.

use kurbo::{Point, Rect, Size};

/// Where a bitmap of `natural` size lands when fitted into `workspace`.
///
/// Uniform scale `min(ws.w / nat.w, ws.h / nat.h)`, centered on both axes.
/// Returns `None` if either size has no area, in which case nothing is drawn.
pub fn fit_rect(workspace: Size, natural: Size) -> Option<Rect> {
    if !has_area(workspace) || !has_area(natural) {
        return None;
    }
    let scale = (workspace.width / natural.width).min(workspace.height / natural.height);
    let drawn = Size::new(natural.width * scale, natural.height * scale);
    let origin = Point::new(
        (workspace.width - drawn.width) / 2.0,
        (workspace.height - drawn.height) / 2.0,
    );
    Some(Rect::from_origin_size(origin, drawn))
}

fn has_area(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn wide_image_is_letterboxed() {
        let r = fit_rect(Size::new(800.0, 600.0), Size::new(1600.0, 400.0)).unwrap();
        assert!(approx(r.width(), 800.0));
        assert!(approx(r.height(), 200.0));
        assert!(approx(r.x0, 0.0));
        assert!(approx(r.y0, 200.0));
    }

    #[test]
    fn tall_image_is_pillarboxed() {
        let r = fit_rect(Size::new(800.0, 600.0), Size::new(300.0, 600.0)).unwrap();
        assert!(approx(r.width(), 300.0));
        assert!(approx(r.height(), 600.0));
        assert!(approx(r.x0, 250.0));
        assert!(approx(r.y0, 0.0));
    }

    #[test]
    fn small_image_scales_up_to_fill_one_axis() {
        let r = fit_rect(Size::new(400.0, 400.0), Size::new(10.0, 20.0)).unwrap();
        assert!(approx(r.height(), 400.0));
        assert!(approx(r.width(), 200.0));
        assert!(approx(r.x0, 100.0));
    }

    #[test]
    fn degenerate_sizes_place_nothing() {
        assert!(fit_rect(Size::ZERO, Size::new(10.0, 10.0)).is_none());
        assert!(fit_rect(Size::new(10.0, 10.0), Size::new(0.0, 5.0)).is_none());
    }
}
