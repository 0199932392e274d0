use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Image fetching
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Dominant color extraction
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Mask painting
    #[serde(default)]
    pub mask: MaskConfig,

    /// Swatch sheet rendering
    #[serde(default)]
    pub swatch_sheet: SwatchSheetConfig,
}

/// Settings for the HTTP image source
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest accepted response body in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!("pigment/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Number of dominant colors requested when the caller gives none
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    8
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MaskConfig {
    /// Initial brush size in display pixels
    #[serde(default = "default_brush_size")]
    pub brush_size: u32,
}

fn default_brush_size() -> u32 {
    crate::services::mask_painter::DEFAULT_BRUSH_SIZE
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            brush_size: default_brush_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SwatchSheetConfig {
    /// Heading drawn at the top of the sheet
    #[serde(default = "default_title")]
    pub title: String,

    /// Name shown in the caption line
    #[serde(default = "default_brand")]
    pub brand: String,
}

fn default_title() -> String {
    "Color Palette".to_string()
}

fn default_brand() -> String {
    "pigment".to_string()
}

impl Default for SwatchSheetConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            brand: default_brand(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    ///
    /// A missing path, unreadable file or invalid YAML never fails the
    /// caller; the problem is logged and defaults are used.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        timeout_secs = config.fetch.timeout_secs,
                        count = config.extraction.count,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }
}
