//! 8-bit RGB color type
//!
//! `Rgb` is the working type for sampled pixels and quantized palette
//! entries. Hex formatting is always uppercase `#RRGGBB`.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// Perceptual channel weights used by [`relative_luminance`].
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// An 8-bit sRGB color.
///
/// # Example
/// ```
/// use median_cut::Rgb;
///
/// let orange = Rgb::new(255, 128, 0);
/// assert_eq!(orange.to_hex(), "#FF8000");
/// assert_eq!("#ff8000".parse::<Rgb>().unwrap(), orange);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Create a color from 8-bit channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from fractional channel values.
    ///
    /// Each channel is clamped to 0..=255 and rounded to the nearest integer.
    /// `NaN` maps to 0.
    #[inline]
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: channel_from_f64(r),
            g: channel_from_f64(g),
            b: channel_from_f64(b),
        }
    }

    /// Channels as an `[r, g, b]` array.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Uppercase `#RRGGBB` representation.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Perceptually weighted luminance in 0.0..=255.0.
    #[inline]
    pub fn luminance(self) -> f64 {
        relative_luminance(self.r as f64, self.g as f64, self.b as f64)
    }

    /// Arithmetic mean of the three channels.
    #[inline]
    pub fn mean(self) -> f64 {
        (self.r as f64 + self.g as f64 + self.b as f64) / 3.0
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a hex color.
    ///
    /// Supports `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`. Parsing is
    /// case-insensitive and surrounding whitespace is trimmed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        let mut digits = [0u8; 6];
        let mut len = 0;
        for (position, ch) in s.chars().enumerate() {
            if position >= digits.len() {
                return Err(ParseColorError::InvalidLength);
            }
            digits[position] = ch
                .to_digit(16)
                .ok_or(ParseColorError::InvalidDigit { position })? as u8;
            len += 1;
        }

        match len {
            // Shorthand: each digit is doubled (0xF -> 0xFF)
            3 => Ok(Self::new(digits[0] * 17, digits[1] * 17, digits[2] * 17)),
            6 => Ok(Self::new(
                digits[0] << 4 | digits[1],
                digits[2] << 4 | digits[3],
                digits[4] << 4 | digits[5],
            )),
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

/// Format fractional channels as an uppercase `#RRGGBB` string.
///
/// Channels are clamped to 0..=255 and rounded before formatting.
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    Rgb::from_f64(r, g, b).to_hex()
}

/// Decode a hex color string. See [`Rgb::from_str`] for accepted forms.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, ParseColorError> {
    hex.parse()
}

/// Perceptual luminance `0.299 r + 0.587 g + 0.114 b`.
///
/// This is the simplified weighting used for UI contrast decisions, not the
/// linear-light sRGB formula.
#[inline]
pub fn relative_luminance(r: f64, g: f64, b: f64) -> f64 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

#[inline]
fn channel_from_f64(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}
