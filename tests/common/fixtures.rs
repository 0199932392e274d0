//! Test images and stroke files.

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Encode an image as PNG bytes
pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .expect("Failed to encode fixture PNG");
    buf.into_inner()
}

/// Encode an image as JPEG bytes (alpha dropped)
pub fn jpeg_bytes(image: &RgbaImage) -> Vec<u8> {
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Jpeg)
        .expect("Failed to encode fixture JPEG");
    buf.into_inner()
}

/// Uniform image
pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color)
}

/// Left half red, right half blue
pub fn red_blue_halves(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| if x < width / 2 { RED } else { BLUE })
}

/// Four quadrants of distinct mid-tone colors
pub fn quadrants(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| match (x < size / 2, y < size / 2) {
        (true, true) => Rgba([200, 40, 40, 255]),
        (false, true) => Rgba([40, 200, 40, 255]),
        (true, false) => Rgba([40, 40, 200, 255]),
        (false, false) => Rgba([200, 200, 40, 255]),
    })
}

/// Strokes file with a single stroke through the given points
pub fn strokes_json(brush_size: u32, points: &[(f32, f32)]) -> String {
    let points: Vec<serde_json::Value> = points
        .iter()
        .map(|(x, y)| serde_json::json!({ "x": x, "y": y }))
        .collect();
    serde_json::json!({ "brush_size": brush_size, "strokes": [points] }).to_string()
}
