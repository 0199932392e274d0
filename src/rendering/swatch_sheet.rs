use chrono::NaiveDate;
use resvg::usvg::{self, fontdb, Transform};
use serde::Serialize;
use std::sync::Arc;
use tera::{Context, Tera};
use tiny_skia::Pixmap;

use crate::error::ExportError;
use crate::models::{SampledColor, Size, SwatchSheetConfig};

use super::surface::{new_pixmap, RasterSurface};

const TEMPLATE_NAME: &str = "swatch_sheet.svg";
const TEMPLATE: &str = include_str!("templates/swatch_sheet.svg");

/// Fixed geometry of the swatch sheet, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwatchLayout {
    pub columns: u32,
    pub rows: u32,
}

impl SwatchLayout {
    pub const SWATCH: u32 = 80;
    pub const GAP: u32 = 12;
    pub const PADDING: u32 = 32;
    pub const LABEL_HEIGHT: u32 = 36;
    pub const HEADER: u32 = 64;
    pub const MAX_COLUMNS: u32 = 8;
    pub const CORNER_RADIUS: u32 = 8;

    /// Layout for `count` swatches; `None` when there is nothing to draw
    pub fn for_count(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        let columns = count.min(Self::MAX_COLUMNS);
        Some(Self {
            columns,
            rows: count.div_ceil(columns),
        })
    }

    pub fn size(&self) -> Size {
        Size::new(
            Self::PADDING * 2 + self.columns * (Self::SWATCH + Self::GAP) - Self::GAP,
            Self::PADDING * 2
                + Self::HEADER
                + self.rows * (Self::SWATCH + Self::LABEL_HEIGHT + Self::GAP),
        )
    }

    /// Top-left corner of swatch `index`
    pub fn origin(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        let col = index % self.columns;
        let row = index / self.columns;
        (
            Self::PADDING + col * (Self::SWATCH + Self::GAP),
            Self::PADDING + Self::HEADER + row * (Self::SWATCH + Self::LABEL_HEIGHT + Self::GAP),
        )
    }
}

#[derive(Serialize)]
struct SwatchView {
    x: u32,
    y: u32,
    hex: String,
    rgb: String,
    hex_y: u32,
    rgb_y: u32,
}

/// Renders palette swatch sheets: SVG from a template, rasterized with resvg.
pub struct SwatchSheetRenderer {
    fontdb: Arc<fontdb::Database>,
    tera: Tera,
    config: SwatchSheetConfig,
}

impl SwatchSheetRenderer {
    pub fn new(config: SwatchSheetConfig) -> Result<Self, ExportError> {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(font_count = fontdb.len(), "Loaded fonts for swatch sheets");

        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;

        Ok(Self {
            fontdb: Arc::new(fontdb),
            tera,
            config,
        })
    }

    /// Render palette entries followed by dominant colors, dated today.
    pub fn render_png(
        &self,
        palette: &[SampledColor],
        dominant: &[SampledColor],
    ) -> Result<Vec<u8>, ExportError> {
        let today = chrono::Local::now().date_naive();
        self.render_png_dated(palette, dominant, today)
    }

    pub fn render_png_dated(
        &self,
        palette: &[SampledColor],
        dominant: &[SampledColor],
        date: NaiveDate,
    ) -> Result<Vec<u8>, ExportError> {
        let pixmap = self.render_pixmap(palette, dominant, date)?;
        pixmap.to_png()
    }

    pub fn render_pixmap(
        &self,
        palette: &[SampledColor],
        dominant: &[SampledColor],
        date: NaiveDate,
    ) -> Result<Pixmap, ExportError> {
        let svg = self.render_svg(palette, dominant, date)?;

        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| ExportError::Svg(e.to_string()))?;

        let size = tree.size().to_int_size();
        let mut pixmap = new_pixmap(Size::new(size.width(), size.height()))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// The SVG source of a sheet, before rasterization
    pub fn render_svg(
        &self,
        palette: &[SampledColor],
        dominant: &[SampledColor],
        date: NaiveDate,
    ) -> Result<String, ExportError> {
        let colors: Vec<&SampledColor> = palette.iter().chain(dominant).collect();
        let layout = SwatchLayout::for_count(colors.len()).ok_or(ExportError::NothingToExport)?;
        let size = layout.size();

        let swatches: Vec<SwatchView> = colors
            .iter()
            .enumerate()
            .map(|(i, color)| {
                let (x, y) = layout.origin(i);
                let rgb = color.rgb();
                SwatchView {
                    x,
                    y,
                    hex: color.hex().to_string(),
                    rgb: format!("{}, {}, {}", rgb.r, rgb.g, rgb.b),
                    hex_y: y + SwatchLayout::SWATCH + 16,
                    rgb_y: y + SwatchLayout::SWATCH + 30,
                }
            })
            .collect();

        let caption = format!(
            "{} colors · {} · {}",
            colors.len(),
            self.config.brand,
            date.format("%Y-%m-%d")
        );

        let mut context = Context::new();
        context.insert("width", &size.width);
        context.insert("height", &size.height);
        context.insert("padding", &SwatchLayout::PADDING);
        context.insert("title_y", &(SwatchLayout::PADDING + 24));
        context.insert("caption_y", &(SwatchLayout::PADDING + 46));
        context.insert("title", &self.config.title);
        context.insert("caption", &caption);
        context.insert("swatch_size", &SwatchLayout::SWATCH);
        context.insert("corner_radius", &SwatchLayout::CORNER_RADIUS);
        context.insert("swatches", &swatches);

        tracing::debug!(colors = colors.len(), size = %size, "Rendering swatch sheet");

        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}
