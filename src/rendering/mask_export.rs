use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use std::io::Cursor;

use crate::error::ExportError;
use crate::models::Size;

use super::surface::RasterSource;

/// Surface pixels with alpha above this count as painted.
const PAINTED_ALPHA: u8 = 10;

/// Resampled values above this become white.
const RESAMPLE_THRESHOLD: u8 = 64;

/// Convert a paint surface into a strict black/white mask at `target` size.
///
/// The surface is binarized at its own resolution first, then resampled with
/// a triangle (bilinear) filter and thresholded again, so the output holds
/// only 0 and 255 regardless of the scale between surface and target.
pub fn render_mask<S: RasterSource + ?Sized>(
    surface: &S,
    target: Size,
) -> Result<GrayImage, ExportError> {
    let source = surface.dimensions();
    for size in [source, target] {
        if size.is_empty() {
            return Err(ExportError::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }
    }

    let binary = GrayImage::from_fn(source.width, source.height, |x, y| {
        let alpha = surface.rgba_at(x, y).map_or(0, |[_, _, _, a]| a);
        Luma([if alpha > PAINTED_ALPHA { 255 } else { 0 }])
    });

    let mut mask = if source == target {
        binary
    } else {
        imageops::resize(&binary, target.width, target.height, FilterType::Triangle)
    };

    for Luma([v]) in mask.pixels_mut() {
        *v = if *v > RESAMPLE_THRESHOLD { 255 } else { 0 };
    }

    tracing::debug!(
        surface = %source,
        target = %target,
        white = mask.pixels().filter(|p| p.0[0] == 255).count(),
        "Rendered mask"
    );

    Ok(mask)
}

/// Render the mask and encode it as an 8-bit grayscale PNG.
pub fn export_mask_png<S: RasterSource + ?Sized>(
    surface: &S,
    target: Size,
) -> Result<Vec<u8>, ExportError> {
    let mask = render_mask(surface, target)?;
    encode_gray_png(&mask)
}

fn encode_gray_png(mask: &GrayImage) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, mask.width(), mask.height());
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(mask.as_raw())
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::surface::new_pixmap;

    fn opaque_pixel_surface(size: Size, x: u32, y: u32) -> tiny_skia::Pixmap {
        let mut pixmap = new_pixmap(size).unwrap();
        let idx = ((y * size.width + x) * 4) as usize;
        pixmap.data_mut()[idx..idx + 4].copy_from_slice(&[0, 235, 2, 255]);
        pixmap
    }

    #[test]
    fn test_single_pixel_at_identity_scale() {
        let surface = opaque_pixel_surface(Size::new(8, 8), 3, 5);
        let mask = render_mask(&surface, Size::new(8, 8)).unwrap();

        for (x, y, p) in mask.enumerate_pixels() {
            let expected = if (x, y) == (3, 5) { 255 } else { 0 };
            assert_eq!(p.0[0], expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn test_faint_paint_is_ignored() {
        let mut surface = new_pixmap(Size::new(4, 4)).unwrap();
        // alpha 10 is at the threshold, not above it
        surface.data_mut()[0..4].copy_from_slice(&[0, 10, 0, 10]);
        let mask = render_mask(&surface, Size::new(4, 4)).unwrap();
        assert!(mask.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_output_is_two_valued_at_target_size() {
        let mut surface = new_pixmap(Size::new(37, 23)).unwrap();
        crate::rendering::stroke::draw_brush_stroke(
            &mut surface,
            crate::models::Point::new(5.0, 5.0),
            crate::models::Point::new(30.0, 18.0),
            4.0,
            crate::rendering::stroke::mask_paint(),
        );

        let mask = render_mask(&surface, Size::new(101, 64)).unwrap();
        assert_eq!(mask.dimensions(), (101, 64));
        assert!(mask.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        assert!(mask.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn test_empty_dimensions_rejected() {
        let surface = new_pixmap(Size::new(4, 4)).unwrap();
        assert!(matches!(
            render_mask(&surface, Size::new(0, 10)),
            Err(ExportError::InvalidDimensions {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn test_export_png_is_grayscale() {
        let surface = opaque_pixel_surface(Size::new(4, 4), 0, 0);
        let png_bytes = export_mask_png(&surface, Size::new(16, 16)).unwrap();

        let decoder = png::Decoder::new(Cursor::new(png_bytes));
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (16, 16));
        assert_eq!(info.color_type, png::ColorType::Grayscale);
        assert_eq!(info.bit_depth, png::BitDepth::Eight);
    }
}
