use thiserror::Error;

/// Failure to turn a URL into decoded pixels.
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Fetching {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode task failed: {0}")]
    Task(String),
}

/// Failure while extracting dominant colors.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not load image for extraction: {0}")]
    Load(#[from] ImageLoadError),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Failure while producing a raster artifact (mask, swatch sheet, magnifier).
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    NothingToExport,

    #[error("No mask has been painted")]
    NoMask,

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("SVG parse error: {0}")]
    Svg(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("PNG encode error: {0}")]
    PngEncode(String),
}

/// Failure to read a palette back from its JSON export.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid palette JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid color {hex:?}: {source}")]
    Color {
        hex: String,
        #[source]
        source: median_cut::ParseColorError,
    },
}
