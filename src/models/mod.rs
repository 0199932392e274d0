pub mod config;
pub mod geometry;
pub mod sampled_color;
pub mod stroke_file;

pub use config::{AppConfig, ExtractionConfig, FetchConfig, MaskConfig, SwatchSheetConfig};
pub use geometry::{Display, Native, Point, ScaleFactor, Size, Surface};
pub use sampled_color::{SamplePosition, SampledColor};
pub use stroke_file::{StrokeFile, StrokePoint};
