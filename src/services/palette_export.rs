//! Text exports of a palette: JSON document, stylesheet variables and a
//! theme config literal.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ImportError;
use crate::models::SampledColor;

const HEADER: &str = "Color Palette - exported from pigment";

/// Output formats offered for a palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Css,
    Theme,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Css => "css",
            Self::Theme => "js",
            Self::Png => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Css => "text/css",
            Self::Theme => "text/javascript",
            Self::Png => "image/png",
        }
    }

    /// Render a text format; `None` for [`ExportFormat::Png`]
    pub fn render_text(self, palette: &[SampledColor], dominant: &[SampledColor]) -> Option<String> {
        match self {
            Self::Json => Some(to_json(palette, dominant)),
            Self::Css => Some(to_css(palette, dominant)),
            Self::Theme => Some(to_theme(palette, dominant)),
            Self::Png => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Css => "css",
            Self::Theme => "theme",
            Self::Png => "png",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "css" => Ok(Self::Css),
            "theme" | "tailwind" => Ok(Self::Theme),
            "png" => Ok(Self::Png),
            other => Err(format!(
                "unknown format {other:?} (expected json, css, theme or png)"
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ColorEntry {
    hex: String,
    #[serde(default)]
    rgb: String,
    #[serde(default)]
    hsl: String,
}

impl From<&SampledColor> for ColorEntry {
    fn from(color: &SampledColor) -> Self {
        Self {
            hex: color.hex().to_string(),
            rgb: color.rgb().to_string(),
            hsl: color.hsl().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaletteDocument {
    palette: Vec<ColorEntry>,
    #[serde(default)]
    dominant_colors: Vec<ColorEntry>,
    #[serde(default)]
    exported_at: String,
}

/// Pretty-printed JSON document stamped with the current time
pub fn to_json(palette: &[SampledColor], dominant: &[SampledColor]) -> String {
    to_json_at(palette, dominant, Utc::now())
}

pub fn to_json_at(
    palette: &[SampledColor],
    dominant: &[SampledColor],
    exported_at: DateTime<Utc>,
) -> String {
    let document = PaletteDocument {
        palette: palette.iter().map(ColorEntry::from).collect(),
        dominant_colors: dominant.iter().map(ColorEntry::from).collect(),
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    // Plain strings and vectors always serialize
    serde_json::to_string_pretty(&document).unwrap_or_default()
}

/// `:root` custom properties, `--palette-N` then `--dominant-N`
pub fn to_css(palette: &[SampledColor], dominant: &[SampledColor]) -> String {
    let mut lines = vec![format!("/* {HEADER} */"), ":root {".to_string()];
    for (i, color) in palette.iter().enumerate() {
        lines.push(format!("  --palette-{}: {};", i + 1, color.hex()));
    }
    if !dominant.is_empty() {
        lines.push(String::new());
        for (i, color) in dominant.iter().enumerate() {
            lines.push(format!("  --dominant-{}: {};", i + 1, color.hex()));
        }
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// A `const colors = {...};` literal for a theme config file
pub fn to_theme(palette: &[SampledColor], dominant: &[SampledColor]) -> String {
    let mut colors = serde_json::Map::new();
    for (i, color) in palette.iter().enumerate() {
        colors.insert(format!("palette-{}", i + 1), color.hex().into());
    }
    for (i, color) in dominant.iter().enumerate() {
        colors.insert(format!("dominant-{}", i + 1), color.hex().into());
    }
    let literal = serde_json::to_string_pretty(&serde_json::Value::Object(colors))
        .unwrap_or_else(|_| "{}".to_string());
    format!("// {HEADER}\nconst colors = {literal};\n")
}

/// Colors read back from a JSON export
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedPalette {
    pub palette: Vec<SampledColor>,
    pub dominant: Vec<SampledColor>,
}

/// Parse a document produced by [`to_json`]. Only `hex` is read per entry;
/// the other fields are recomputed.
pub fn import_json(json: &str) -> Result<ImportedPalette, ImportError> {
    let document: PaletteDocument = serde_json::from_str(json)?;

    let convert = |entries: Vec<ColorEntry>| -> Result<Vec<SampledColor>, ImportError> {
        entries
            .into_iter()
            .map(|entry| {
                entry
                    .hex
                    .parse::<median_cut::Rgb>()
                    .map(SampledColor::new)
                    .map_err(|source| ImportError::Color {
                        hex: entry.hex.clone(),
                        source,
                    })
            })
            .collect()
    };

    Ok(ImportedPalette {
        palette: convert(document.palette)?,
        dominant: convert(document.dominant_colors)?,
    })
}
