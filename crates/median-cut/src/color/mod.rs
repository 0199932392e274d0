//! Color types and conversion utilities
//!
//! - [`Rgb`]: 8-bit working color, hex formatting and parsing
//! - [`Hsl`]: rounded hue/saturation/lightness derived from [`Rgb`]
//! - [`TextTone`]: light/dark label choice for a background color

mod contrast;
mod hsl;
mod rgb;

pub use contrast::{contrast_text_color, TextTone};
pub use hsl::{rgb_to_hsl, Hsl};
pub use rgb::{hex_to_rgb, relative_luminance, rgb_to_hex, Rgb};
