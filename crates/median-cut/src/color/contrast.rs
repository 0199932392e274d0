//! Text tone selection for labels drawn on top of a color.

use super::rgb::Rgb;
use crate::error::ParseColorError;

/// Luminance above which dark text is used.
const DARK_TEXT_THRESHOLD: f64 = 128.0;

/// Which text color reads best on a given background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    /// Dark text for light backgrounds
    Dark,
    /// Light text for dark backgrounds
    Light,
}

impl TextTone {
    /// CSS color token for this tone.
    pub fn css(self) -> &'static str {
        match self {
            TextTone::Dark => "rgba(0,0,0,0.8)",
            TextTone::Light => "rgba(255,255,255,0.9)",
        }
    }

    /// Pick the tone for an already decoded color.
    pub fn for_background(rgb: Rgb) -> Self {
        if rgb.luminance() > DARK_TEXT_THRESHOLD {
            TextTone::Dark
        } else {
            TextTone::Light
        }
    }
}

/// Pick the text tone for a hex background color.
pub fn contrast_text_color(hex: &str) -> Result<TextTone, ParseColorError> {
    Ok(TextTone::for_background(hex.parse()?))
}
