//! Pixelated zoom preview for the eyedropper.
//!
//! A 15×15 neighborhood around the focus pixel is drawn with nearest-neighbor
//! cells inside a circular clip, and the center cell is outlined so the
//! sampled pixel stays visible on any background.

use tiny_skia::{Color, FillRule, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::error::ExportError;
use crate::models::Size;

use super::surface::{new_pixmap, RasterSource, RasterSurface};

/// Edge length of the magnifier output in pixels
pub const MAGNIFIER_SIZE: u32 = 140;

/// Source pixels shown along each axis
pub const MAGNIFIER_GRID: u32 = 15;

const HALF: i64 = (MAGNIFIER_GRID / 2) as i64;
const CELL: f32 = MAGNIFIER_SIZE as f32 / MAGNIFIER_GRID as f32;
const BACKGROUND: [u8; 3] = [0x0A, 0x0A, 0x0A];

/// Reusable magnifier frame with its clip mask built once.
pub struct Magnifier {
    frame: Pixmap,
    clip: Mask,
}

impl Magnifier {
    pub fn new() -> Result<Self, ExportError> {
        let size = Size::new(MAGNIFIER_SIZE, MAGNIFIER_SIZE);
        let frame = new_pixmap(size)?;
        let clip = circular_clip()?;
        Ok(Self { frame, clip })
    }

    /// Redraw the frame around `(focus_x, focus_y)` in source pixels.
    pub fn draw<S: RasterSource + ?Sized>(&mut self, source: &S, focus_x: f64, focus_y: f64) {
        paint_frame(&mut self.frame, &self.clip, source, focus_x, focus_y);
    }

    /// The most recently drawn frame
    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    pub fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        self.frame.to_png()
    }
}

/// Draw a magnifier frame into a caller-supplied 140×140 pixmap.
pub fn draw_magnifier<S: RasterSource + ?Sized>(
    target: &mut Pixmap,
    source: &S,
    focus_x: f64,
    focus_y: f64,
) -> Result<(), ExportError> {
    if target.width() != MAGNIFIER_SIZE || target.height() != MAGNIFIER_SIZE {
        return Err(ExportError::InvalidDimensions {
            width: target.width(),
            height: target.height(),
        });
    }
    let clip = circular_clip()?;
    paint_frame(target, &clip, source, focus_x, focus_y);
    Ok(())
}

fn circular_clip() -> Result<Mask, ExportError> {
    let mut clip =
        Mask::new(MAGNIFIER_SIZE, MAGNIFIER_SIZE).ok_or(ExportError::PixmapAllocation)?;
    let center = MAGNIFIER_SIZE as f32 / 2.0;
    let circle =
        PathBuilder::from_circle(center, center, center - 1.0).ok_or(ExportError::PixmapAllocation)?;
    clip.fill_path(&circle, FillRule::Winding, true, Transform::identity());
    Ok(clip)
}

fn paint_frame<S: RasterSource + ?Sized>(
    frame: &mut Pixmap,
    clip: &Mask,
    source: &S,
    focus_x: f64,
    focus_y: f64,
) {
    let [r, g, b] = BACKGROUND;
    frame.fill(Color::from_rgba8(r, g, b, 255));

    let size = source.dimensions();
    let origin_x = grid_origin(focus_x, size.width);
    let origin_y = grid_origin(focus_y, size.height);

    // Cells meet at fractional edges; aliased fills keep them seamless
    let mut paint = Paint {
        anti_alias: false,
        ..Paint::default()
    };

    for row in 0..MAGNIFIER_GRID {
        let sy = origin_y + row as i64;
        if sy < 0 || sy >= size.height as i64 {
            continue;
        }
        for col in 0..MAGNIFIER_GRID {
            let sx = origin_x + col as i64;
            if sx < 0 || sx >= size.width as i64 {
                continue;
            }
            let Some([r, g, b, a]) = source.rgba_at(sx as u32, sy as u32) else {
                continue;
            };
            let Some(rect) = Rect::from_xywh(col as f32 * CELL, row as f32 * CELL, CELL, CELL)
            else {
                continue;
            };
            paint.set_color_rgba8(r, g, b, a);
            frame.fill_rect(rect, &paint, Transform::identity(), Some(clip));
        }
    }

    draw_crosshair(frame, clip);
}

/// First source index of the grid along one axis. A focus further than
/// `HALF` outside the image shows only background, so it is clamped there.
fn grid_origin(focus: f64, len: u32) -> i64 {
    let focus = if focus.is_nan() { 0.0 } else { focus.floor() };
    let limit = (len as i64 + HALF) as f64;
    focus.clamp(-(HALF as f64) - 1.0, limit) as i64 - HALF
}

fn draw_crosshair(frame: &mut Pixmap, clip: &Mask) {
    let c = HALF as f32 * CELL;

    let outlines = [
        // light inner ring
        (Rect::from_xywh(c + 1.0, c + 1.0, CELL - 2.0, CELL - 2.0), [255, 255, 255, 242], 2.0),
        // dark outer ring
        (Rect::from_xywh(c, c, CELL, CELL), [0, 0, 0, 153], 1.0),
    ];

    for (rect, [r, g, b, a], width) in outlines {
        let Some(rect) = rect else { continue };
        let path = PathBuilder::from_rect(rect);
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        frame.stroke_path(&path, &paint, &stroke, Transform::identity(), Some(clip));
    }
}
