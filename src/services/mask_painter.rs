use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use crate::error::ExportError;
use crate::models::{Display, MaskConfig, Point, ScaleFactor, Size, StrokeFile, Surface};
use crate::rendering::{draw_brush_stroke, export_mask_png, mask_paint, new_pixmap, stamp, RasterSurface};

pub const DEFAULT_BRUSH_SIZE: u32 = 30;
pub const BRUSH_SIZE_MIN: u32 = 5;
pub const BRUSH_SIZE_MAX: u32 = 100;

/// Instruction sent with the mask in [`EditMode::Remove`]
pub const REMOVE_INSTRUCTION: &str =
    "Remove the masked object and fill the area so it blends with the surrounding background";

/// Clamp a requested brush size into the supported range
pub fn clamp_brush_size(size: u32) -> u32 {
    size.clamp(BRUSH_SIZE_MIN, BRUSH_SIZE_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Change the masked region as described by the prompt
    #[default]
    Edit,
    /// Erase the masked object
    Remove,
}

/// Everything the inpainting service needs for one edit.
#[derive(Debug, Clone)]
pub struct MaskSubmission {
    pub image_url: String,
    /// Grayscale PNG at the image's native size; white marks the region to change
    pub mask_png: Vec<u8>,
    pub size: Size,
    pub edit_mode: EditMode,
    pub instruction: Option<String>,
}

/// Brush state and paint surface for one mask-editing session.
pub struct MaskPainterSession {
    brush_size: u32,
    default_brush_size: u32,
    has_mask: bool,
    edit_mode: EditMode,
    prompt: String,
    surface: Option<Pixmap>,
    last_point: Option<Point<Surface>>,
}

impl MaskPainterSession {
    pub fn new(config: &MaskConfig) -> Self {
        Self {
            brush_size: config.brush_size,
            default_brush_size: config.brush_size,
            has_mask: false,
            edit_mode: EditMode::Edit,
            prompt: String::new(),
            surface: None,
            last_point: None,
        }
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Stored as given; use [`clamp_brush_size`] for user input.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size;
    }

    pub fn has_mask(&self) -> bool {
        self.has_mask
    }

    pub fn set_has_mask(&mut self, has_mask: bool) {
        self.has_mask = has_mask;
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.edit_mode = mode;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Back to defaults, with a blank surface of the same size.
    pub fn reset(&mut self) {
        self.brush_size = self.default_brush_size;
        self.edit_mode = EditMode::Edit;
        self.prompt.clear();
        self.clear_mask();
    }

    /// The instruction to send with the mask.
    ///
    /// Remove mode always has one; edit mode uses the trimmed prompt and
    /// yields `None` when it is blank.
    pub fn instruction(&self) -> Option<String> {
        match self.edit_mode {
            EditMode::Remove => Some(REMOVE_INSTRUCTION.to_string()),
            EditMode::Edit => {
                let prompt = self.prompt.trim();
                (!prompt.is_empty()).then(|| prompt.to_string())
            }
        }
    }

    pub fn surface(&self) -> Option<&Pixmap> {
        self.surface.as_ref()
    }

    /// Match the surface to the rendered image size.
    ///
    /// A size change replaces the surface with a blank one and clears
    /// `has_mask`; the same size keeps existing strokes.
    pub fn resize_surface(&mut self, size: Size) -> Result<(), ExportError> {
        if let Some(surface) = &self.surface {
            if surface.width() == size.width && surface.height() == size.height {
                return Ok(());
            }
        }
        self.surface = Some(new_pixmap(size)?);
        self.has_mask = false;
        self.last_point = None;
        tracing::debug!(size = %size, "Resized paint surface");
        Ok(())
    }

    fn brush_radius(&self, scale: ScaleFactor<Display, Surface>) -> f32 {
        scale.apply_length(self.brush_size as f32)
    }

    /// Pointer down: stamp one circle. Returns the number of stamps drawn.
    pub fn begin_stroke(
        &mut self,
        at: Point<Display>,
        scale: ScaleFactor<Display, Surface>,
    ) -> usize {
        let radius = self.brush_radius(scale);
        let Some(surface) = self.surface.as_mut() else {
            return 0;
        };
        let point = scale.apply(at);
        let drawn = stamp(surface, point, radius, mask_paint());
        if drawn > 0 {
            self.has_mask = true;
        }
        self.last_point = Some(point);
        drawn
    }

    /// Pointer move while drawing: fill the segment from the previous point.
    pub fn continue_stroke(
        &mut self,
        to: Point<Display>,
        scale: ScaleFactor<Display, Surface>,
    ) -> usize {
        let radius = self.brush_radius(scale);
        let (Some(surface), Some(from)) = (self.surface.as_mut(), self.last_point) else {
            return 0;
        };
        let point = scale.apply(to);
        let drawn = draw_brush_stroke(surface, from, point, radius, mask_paint());
        if drawn > 0 {
            self.has_mask = true;
        }
        self.last_point = Some(point);
        drawn
    }

    /// Paint every stroke of a recorded file, applying its clamped brush
    /// size first. Empty strokes are skipped. Returns the number of stamps.
    pub fn replay(&mut self, file: &StrokeFile, scale: ScaleFactor<Display, Surface>) -> usize {
        if let Some(size) = file.brush_size {
            self.brush_size = clamp_brush_size(size);
        }

        let mut stamps = 0;
        for stroke in &file.strokes {
            let mut points = stroke.iter().copied().map(Point::from);
            let Some(first) = points.next() else {
                continue;
            };
            stamps += self.begin_stroke(first, scale);
            for point in points {
                stamps += self.continue_stroke(point, scale);
            }
            self.end_stroke();
        }
        stamps
    }

    /// Pointer up or leave
    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    pub fn is_stroking(&self) -> bool {
        self.last_point.is_some()
    }

    /// Erase all strokes
    pub fn clear_mask(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.has_mask = false;
        self.last_point = None;
    }

    /// Export the surface as a binary mask PNG at `target` size
    pub fn export_mask(&self, target: Size) -> Result<Vec<u8>, ExportError> {
        let surface = self.surface.as_ref().ok_or(ExportError::NoMask)?;
        export_mask_png(surface, target)
    }

    /// Bundle the image, mask and instruction for the inpainting service.
    pub fn submission(
        &self,
        image_url: &str,
        target: Size,
    ) -> Result<MaskSubmission, ExportError> {
        if !self.has_mask {
            return Err(ExportError::NoMask);
        }
        let mask_png = self.export_mask(target)?;
        tracing::info!(
            image_url = %image_url,
            size = %target,
            mode = ?self.edit_mode,
            "Prepared mask submission"
        );
        Ok(MaskSubmission {
            image_url: image_url.to_string(),
            mask_png,
            size: target,
            edit_mode: self.edit_mode,
            instruction: self.instruction(),
        })
    }
}

impl Default for MaskPainterSession {
    fn default() -> Self {
        Self::new(&MaskConfig::default())
    }
}
