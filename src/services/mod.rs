pub mod color_sampler;
pub mod image_source;
pub mod mask_painter;
pub mod palette_export;
pub mod pixel_loader;

pub use color_sampler::{
    dominant_colors, extract_dominant_colors, ColorSamplingSession, DEFAULT_DOMINANT_COUNT,
};
pub use image_source::{HttpImageSource, ImageSource, InMemoryImageSource};
pub use mask_painter::{
    clamp_brush_size, EditMode, MaskPainterSession, MaskSubmission, BRUSH_SIZE_MAX,
    BRUSH_SIZE_MIN, DEFAULT_BRUSH_SIZE, REMOVE_INSTRUCTION,
};
pub use palette_export::{import_json, to_css, to_json, to_theme, ExportFormat, ImportedPalette};
pub use pixel_loader::PixelLoader;
