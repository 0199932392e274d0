//! Median-cut color quantization
//!
//! Reduces an arbitrary population of colors to at most `target` colors by
//! repeatedly splitting the box with the widest channel range at its median.
//!
//! ```
//! use median_cut::{median_cut, Rgb};
//!
//! let mut pixels = vec![Rgb::new(255, 0, 0); 50];
//! pixels.extend(vec![Rgb::new(0, 0, 255); 50]);
//!
//! let palette = median_cut(pixels, 8);
//! assert_eq!(palette.len(), 2);
//! ```

mod color_box;

use color_box::ColorBox;

use crate::color::Rgb;

/// Quantize `pixels` to at most `target` representative colors.
///
/// - An empty population yields an empty palette.
/// - A population with `len <= target` is returned unchanged.
/// - Otherwise boxes are split until `target` boxes exist or no box can be
///   split (every remaining box has a single member or zero range), so the
///   result holds between 1 and `target` colors.
///
/// `target == 0` is treated as 1.
///
/// When several boxes share the widest range, the first one in the internal
/// box list is split. That order depends on the split history and is not a
/// documented total order.
pub fn median_cut(pixels: Vec<Rgb>, target: usize) -> Vec<Rgb> {
    let target = target.max(1);
    if pixels.is_empty() {
        return Vec::new();
    }
    if pixels.len() <= target {
        return pixels;
    }

    let mut boxes = vec![ColorBox::new(pixels)];

    while boxes.len() < target {
        let Some(idx) = widest_splittable(&boxes) else {
            break;
        };
        // The lower half takes the original slot, the upper half is appended
        let (lower, upper) = std::mem::replace(&mut boxes[idx], ColorBox::new(Vec::new())).split();
        boxes[idx] = lower;
        boxes.push(upper);
    }

    boxes.iter().map(ColorBox::average).collect()
}

/// Sort colors darkest first by perceptual luminance.
pub fn sort_by_luminance(colors: &mut [Rgb]) {
    colors.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));
}

/// Index of the first box with the widest non-zero range and at least two
/// members.
fn widest_splittable(boxes: &[ColorBox]) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (i, b) in boxes.iter().enumerate() {
        if b.len() < 2 {
            continue;
        }
        let range = b.widest_range();
        if range > best.map_or(0, |(_, r)| r) {
            best = Some((i, range));
        }
    }
    best.map(|(i, _)| i)
}
