//! HSL representation of an [`Rgb`] color, rounded to integers.

use std::fmt;

use super::rgb::Rgb;

/// Hue/saturation/lightness with integer components.
///
/// - `h` in 0..360 degrees
/// - `s` and `l` in 0..=100 percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl From<Rgb> for Hsl {
    /// Standard min/max-channel decomposition.
    ///
    /// Achromatic colors (`max == min`) have `h = 0` and `s = 0`.
    fn from(rgb: Rgb) -> Self {
        let r = rgb.r as f64 / 255.0;
        let g = rgb.g as f64 / 255.0;
        let b = rgb.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Self {
                h: 0,
                s: 0,
                l: percent(l),
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
        } else if max == g {
            ((b - r) / d + 2.0) / 6.0
        } else {
            ((r - g) / d + 4.0) / 6.0
        };

        // A hue just below 360 rounds up; keep it in 0..360
        let h = (h * 360.0).round() as u16 % 360;

        Self {
            h,
            s: percent(s),
            l: percent(l),
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

/// Convert an RGB color to rounded HSL.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    Hsl::from(rgb)
}

#[inline]
fn percent(v: f64) -> u8 {
    (v * 100.0).round().clamp(0.0, 100.0) as u8
}
