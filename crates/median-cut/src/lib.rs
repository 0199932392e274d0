//! median-cut: color space helpers and palette quantization
//!
//! This crate holds the numeric core of palette extraction: conversions
//! between hex, RGB and HSL, a perceptual luminance weighting, and a
//! median-cut quantizer that reduces any population of colors to a small
//! representative palette.
//!
//! # Quick Start
//!
//! ```
//! use median_cut::{median_cut, sort_by_luminance, Hsl, Rgb};
//!
//! let pixels: Vec<Rgb> = (0..=255u8).map(|v| Rgb::new(v, v / 2, 255 - v)).collect();
//! let mut palette = median_cut(pixels, 4);
//! sort_by_luminance(&mut palette);
//!
//! assert_eq!(palette.len(), 4);
//! for color in &palette {
//!     let hsl = Hsl::from(*color);
//!     assert!(hsl.h < 360);
//! }
//! ```
//!
//! # Luminance
//!
//! [`relative_luminance`] uses the `0.299 / 0.587 / 0.114` weighting on
//! gamma-encoded channels. It is a cheap ordering key for "dark to light"
//! palettes and for picking label colors, not a colorimetric quantity.
//!
//! # Quantization
//!
//! [`median_cut`] repeatedly splits the box with the widest single-channel
//! range at its median until the requested count is reached or nothing is
//! left to split. Each box is represented by the rounded mean of its
//! members. Results are deterministic for a given input order.

pub mod color;
pub mod error;
pub mod quantize;


pub use color::{
    contrast_text_color, hex_to_rgb, relative_luminance, rgb_to_hex, rgb_to_hsl, Hsl, Rgb,
    TextTone,
};
pub use error::ParseColorError;
pub use quantize::{median_cut, sort_by_luminance};
