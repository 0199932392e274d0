pub mod magnifier;
pub mod mask_export;
pub mod pixel_buffer;
pub mod stroke;
pub mod surface;
pub mod swatch_sheet;

pub use magnifier::{draw_magnifier, Magnifier, MAGNIFIER_GRID, MAGNIFIER_SIZE};
pub use mask_export::{export_mask_png, render_mask};
pub use pixel_buffer::PixelBuffer;
pub use stroke::{draw_brush_stroke, mask_paint, stamp, MASK_PAINT};
pub use surface::{new_pixmap, RasterSource, RasterSurface};
pub use swatch_sheet::{SwatchLayout, SwatchSheetRenderer};
