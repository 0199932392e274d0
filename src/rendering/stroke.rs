//! Brush stroke rasterization onto a paint surface.

use tiny_skia::Color;

use crate::models::{Point, Surface};

use super::surface::RasterSurface;

/// Straight RGBA of the mask overlay paint: `rgba(0, 235, 2, 0.35)`.
pub const MASK_PAINT: [u8; 4] = [0, 235, 2, 89];

/// Spacing between stamps as a fraction of the brush radius.
const STAMP_SPACING: f32 = 0.3;

/// [`MASK_PAINT`] as a tiny-skia color
pub fn mask_paint() -> Color {
    let [r, g, b, a] = MASK_PAINT;
    Color::from_rgba8(r, g, b, a)
}

fn is_drawable(radius: f32) -> bool {
    radius.is_finite() && radius > 0.0
}

/// Draw a single brush circle (pointer-down). Returns the number of stamps drawn.
pub fn stamp<S: RasterSurface + ?Sized>(
    surface: &mut S,
    at: Point<Surface>,
    radius: f32,
    color: Color,
) -> usize {
    if !is_drawable(radius) {
        return 0;
    }
    surface.fill_circle(at, radius, color);
    1
}

/// Draw a segment as evenly spaced circles so fast pointer moves leave no gaps.
///
/// `steps = max(ceil(distance / (radius * 0.3)), 1)` and `steps + 1` circles
/// are stamped, both endpoints included. Returns the number of stamps drawn.
pub fn draw_brush_stroke<S: RasterSurface + ?Sized>(
    surface: &mut S,
    from: Point<Surface>,
    to: Point<Surface>,
    radius: f32,
    color: Color,
) -> usize {
    if !is_drawable(radius) {
        return 0;
    }

    let distance = from.distance(to);
    let steps = ((distance / (radius * STAMP_SPACING)).ceil() as usize).max(1);

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        surface.fill_circle(from.lerp(to, t), radius, color);
    }

    steps + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Size;
    use crate::rendering::surface::{new_pixmap, RasterSource};

    #[test]
    fn test_stroke_stamp_count() {
        let mut pixmap = new_pixmap(Size::new(100, 100)).unwrap();
        // distance 30, radius 10 -> spacing 3 -> 10 steps
        let stamps = draw_brush_stroke(
            &mut pixmap,
            Point::new(10.0, 50.0),
            Point::new(40.0, 50.0),
            10.0,
            mask_paint(),
        );
        assert_eq!(stamps, 11);
    }

    #[test]
    fn test_zero_length_stroke_stamps_twice() {
        let mut pixmap = new_pixmap(Size::new(10, 10)).unwrap();
        let p = Point::new(5.0, 5.0);
        assert_eq!(draw_brush_stroke(&mut pixmap, p, p, 2.0, mask_paint()), 2);
    }

    #[test]
    fn test_invalid_radius_draws_nothing() {
        let mut pixmap = new_pixmap(Size::new(10, 10)).unwrap();
        let a = Point::new(1.0, 1.0);
        let b = Point::new(8.0, 8.0);
        assert_eq!(draw_brush_stroke(&mut pixmap, a, b, 0.0, mask_paint()), 0);
        assert_eq!(draw_brush_stroke(&mut pixmap, a, b, -4.0, mask_paint()), 0);
        assert_eq!(draw_brush_stroke(&mut pixmap, a, b, f32::NAN, mask_paint()), 0);
        assert_eq!(stamp(&mut pixmap, a, f32::INFINITY, mask_paint()), 0);
        assert!(pixmap.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_stroke_covers_segment_without_gaps() {
        let mut pixmap = new_pixmap(Size::new(200, 40)).unwrap();
        draw_brush_stroke(
            &mut pixmap,
            Point::new(10.0, 20.0),
            Point::new(190.0, 20.0),
            4.0,
            mask_paint(),
        );
        for x in 10..190 {
            let [_, _, _, a] = pixmap.rgba_at(x, 20).unwrap();
            assert!(a > 10, "gap at x={x}");
        }
        assert_eq!(pixmap.rgba_at(100, 2).unwrap()[3], 0);
    }

    #[test]
    fn test_single_stamp_uses_mask_paint() {
        let mut pixmap = new_pixmap(Size::new(20, 20)).unwrap();
        assert_eq!(stamp(&mut pixmap, Point::new(10.0, 10.0), 5.0, mask_paint()), 1);

        let [r, g, b, a] = pixmap.rgba_at(10, 10).unwrap();
        assert!(a.abs_diff(89) <= 1);
        assert_eq!(r, 0);
        // Premultiplied storage loses a little precision on the way back
        assert!(g.abs_diff(235) <= 2);
        assert!(b <= 4);
    }
}
