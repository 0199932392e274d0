use chrono::{DateTime, Utc};
use median_cut::{Hsl, Rgb};
use serde::Serialize;

/// Where on the source image a color was taken, normalized to 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePosition {
    pub x: f64,
    pub y: f64,
}

impl SamplePosition {
    /// Create a position, clamping both axes into 0..=1.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// An immutable color sample.
///
/// Hex and HSL are derived from the RGB value at construction and cannot be
/// changed independently, so `hex == rgb.to_hex()` and `hsl == Hsl::from(rgb)`
/// always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledColor {
    hex: String,
    rgb: Rgb,
    hsl: Hsl,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<SamplePosition>,
}

impl SampledColor {
    /// Sample a color now, without a source position.
    pub fn new(rgb: Rgb) -> Self {
        Self::at(rgb, None, Utc::now())
    }

    /// Sample a color now, recording where it was taken.
    pub fn with_position(rgb: Rgb, position: SamplePosition) -> Self {
        Self::at(rgb, Some(position), Utc::now())
    }

    /// Build a sample from fractional channels (clamped and rounded).
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(Rgb::from_f64(r, g, b))
    }

    /// Build a sample with an explicit timestamp.
    pub fn at(rgb: Rgb, position: Option<SamplePosition>, timestamp: DateTime<Utc>) -> Self {
        Self {
            hex: rgb.to_hex(),
            rgb,
            hsl: Hsl::from(rgb),
            timestamp,
            position,
        }
    }

    /// Uppercase `#RRGGBB`
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn hsl(&self) -> Hsl {
        self.hsl
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn position(&self) -> Option<SamplePosition> {
        self.position
    }
}

impl From<Rgb> for SampledColor {
    fn from(rgb: Rgb) -> Self {
        Self::new(rgb)
    }
}
