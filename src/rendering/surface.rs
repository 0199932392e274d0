use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::error::ExportError;
use crate::models::{Point, Size, Surface};

/// Read access to a raster: dimensions and straight-alpha RGBA pixels.
pub trait RasterSource {
    fn dimensions(&self) -> Size;

    /// RGBA at integer coordinates, `None` outside the raster
    fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]>;
}

/// A raster that strokes can be painted into.
pub trait RasterSurface: RasterSource {
    /// Fill an anti-aliased circle, composited source-over.
    fn fill_circle(&mut self, center: Point<Surface>, radius: f32, color: Color);

    /// Reset every pixel to fully transparent
    fn clear(&mut self);

    /// Encode the current contents as an RGBA PNG
    fn to_png(&self) -> Result<Vec<u8>, ExportError>;
}

impl RasterSource for Pixmap {
    fn dimensions(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        // `pixel` only bounds-checks the flat index, so x past the row end wraps
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }
}

impl RasterSurface for Pixmap {
    fn fill_circle(&mut self, center: Point<Surface>, radius: f32, color: Color) {
        if !(radius.is_finite() && radius > 0.0) {
            return;
        }
        let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        self.fill_path(
            &path,
            &paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    fn clear(&mut self) {
        self.fill(Color::TRANSPARENT);
    }

    fn to_png(&self) -> Result<Vec<u8>, ExportError> {
        self.encode_png()
            .map_err(|e| ExportError::PngEncode(e.to_string()))
    }
}

/// Allocate a transparent pixmap, rejecting zero-sized dimensions.
pub fn new_pixmap(size: Size) -> Result<Pixmap, ExportError> {
    if size.is_empty() {
        return Err(ExportError::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }
    Pixmap::new(size.width, size.height).ok_or(ExportError::PixmapAllocation)
}
