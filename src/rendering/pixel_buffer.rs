use image::RgbaImage;
use median_cut::Rgb;

use crate::models::{SamplePosition, Size};

use super::surface::RasterSource;

/// Immutable decoded copy of an image at its natural resolution.
///
/// Built only after a complete decode, so a buffer that exists is always
/// fully populated.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Underlying RGBA pixels
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Color of the pixel containing `(x, y)` in native pixels.
    ///
    /// Coordinates are floored and clamped onto the image, so any input,
    /// including negative or NaN values, yields an edge pixel rather than
    /// an error. An empty buffer reads as black.
    pub fn get_pixel_color(&self, x: f64, y: f64) -> Rgb {
        if self.image.width() == 0 || self.image.height() == 0 {
            return Rgb::default();
        }
        let px = clamp_index(x, self.image.width());
        let py = clamp_index(y, self.image.height());
        let [r, g, b, _] = self.image.get_pixel(px, py).0;
        Rgb::new(r, g, b)
    }

    /// `(x / width, y / height)` clamped to the unit square
    pub fn normalized_position(&self, x: f64, y: f64) -> SamplePosition {
        let w = self.image.width().max(1) as f64;
        let h = self.image.height().max(1) as f64;
        SamplePosition::new(x / w, y / h)
    }
}

// `as` saturates and maps NaN to 0
fn clamp_index(v: f64, len: u32) -> u32 {
    (v.floor() as i64).clamp(0, len as i64 - 1) as u32
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self::new(image)
    }
}

impl RasterSource for PixelBuffer {
    fn dimensions(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    fn rgba_at(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10).min(255) as u8, (y * 10).min(255) as u8, 7, 255])
        }))
    }

    #[test]
    fn test_get_pixel_color_floors() {
        let buffer = gradient(4, 3);
        assert_eq!(buffer.get_pixel_color(2.9, 1.1), Rgb::new(20, 10, 7));
    }

    #[test]
    fn test_get_pixel_color_clamps_out_of_range() {
        let buffer = gradient(4, 3);
        assert_eq!(buffer.get_pixel_color(-3.0, -0.5), Rgb::new(0, 0, 7));
        assert_eq!(buffer.get_pixel_color(100.0, 100.0), Rgb::new(30, 20, 7));
        assert_eq!(buffer.get_pixel_color(f64::NAN, 1.0), Rgb::new(0, 10, 7));
    }

    #[test]
    fn test_empty_buffer_reads_black() {
        let buffer = PixelBuffer::new(RgbaImage::new(0, 0));
        assert_eq!(buffer.get_pixel_color(0.0, 0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_normalized_position() {
        let buffer = gradient(200, 100);
        let position = buffer.normalized_position(50.0, 25.0);
        assert_eq!(position, SamplePosition::new(0.25, 0.25));
        assert_eq!(
            buffer.normalized_position(400.0, -1.0),
            SamplePosition::new(1.0, 0.0)
        );
    }

    #[test]
    fn test_raster_source() {
        let buffer = gradient(4, 3);
        assert_eq!(buffer.dimensions(), Size::new(4, 3));
        assert_eq!(buffer.rgba_at(1, 2), Some([10, 20, 7, 255]));
        assert_eq!(buffer.rgba_at(4, 0), None);
    }
}
