//! Assertion helpers for tests.

use image::GrayImage;

/// Assert bytes start with the PNG signature
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Decode a mask PNG, asserting it is 8-bit grayscale
pub fn decode_mask(bytes: &[u8]) -> GrayImage {
    assert_png(bytes);
    let image = image::load_from_memory(bytes).expect("Mask PNG should decode");
    assert!(
        matches!(image, image::DynamicImage::ImageLuma8(_)),
        "Expected 8-bit grayscale mask, got {:?}",
        image.color()
    );
    image.to_luma8()
}

/// Assert every pixel is exactly 0 or 255
pub fn assert_binary(mask: &GrayImage) {
    if let Some((x, y, p)) = mask
        .enumerate_pixels()
        .find(|(_, _, p)| p.0[0] != 0 && p.0[0] != 255)
    {
        panic!("Mask pixel ({x}, {y}) is {}, expected 0 or 255", p.0[0]);
    }
}

/// Number of white pixels
pub fn white_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] == 255).count()
}
