use image::imageops::{self, FilterType};
use median_cut::{median_cut, sort_by_luminance, Rgb};
use std::borrow::Cow;
use std::sync::Arc;

use crate::error::{ExtractionError, ImageLoadError};
use crate::models::SampledColor;
use crate::rendering::{Magnifier, PixelBuffer};

use super::pixel_loader::PixelLoader;

/// Number of dominant colors extracted when the caller has no preference
pub const DEFAULT_DOMINANT_COUNT: usize = 8;

/// Longest edge of the image population fed to the quantizer
const MAX_SAMPLE_EDGE: u32 = 150;

/// Pixels below this alpha are ignored
const MIN_ALPHA: u8 = 128;

/// Near-white and near-black pixels (by channel mean) are ignored
const MAX_BRIGHTNESS: f64 = 248.0;
const MIN_BRIGHTNESS: f64 = 7.0;

/// Quantize an already decoded image into at most `count` dominant colors,
/// darkest first.
pub fn dominant_colors(buffer: &PixelBuffer, count: usize) -> Vec<Rgb> {
    let image = buffer.as_image();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let scale = (MAX_SAMPLE_EDGE as f64 / width.max(height) as f64).min(1.0);
    let sampled = if scale < 1.0 {
        let sw = ((width as f64 * scale).floor() as u32).max(1);
        let sh = ((height as f64 * scale).floor() as u32).max(1);
        Cow::Owned(imageops::resize(image, sw, sh, FilterType::Triangle))
    } else {
        Cow::Borrowed(image)
    };

    let pixels: Vec<Rgb> = sampled
        .pixels()
        .filter(|p| p.0[3] >= MIN_ALPHA)
        .map(|p| Rgb::new(p.0[0], p.0[1], p.0[2]))
        .filter(|rgb| (MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&rgb.mean()))
        .collect();

    tracing::debug!(
        width = sampled.width(),
        height = sampled.height(),
        population = pixels.len(),
        "Sampled pixels for quantization"
    );

    let mut colors = median_cut(pixels, count);
    sort_by_luminance(&mut colors);
    colors
}

/// Load `url` and extract its dominant colors.
///
/// An image with nothing left after filtering (blank, transparent) yields an
/// empty list rather than an error.
pub async fn extract_dominant_colors(
    loader: &PixelLoader,
    url: &str,
    count: usize,
) -> Result<Vec<SampledColor>, ExtractionError> {
    let buffer = loader.load(url).await?;
    extract_from_buffer(Arc::new(buffer), count).await
}

async fn extract_from_buffer(
    buffer: Arc<PixelBuffer>,
    count: usize,
) -> Result<Vec<SampledColor>, ExtractionError> {
    let colors = tokio::task::spawn_blocking(move || dominant_colors(&buffer, count))
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))?;
    Ok(colors.into_iter().map(SampledColor::new).collect())
}

/// Clears the extracting flag on every exit path, including cancellation.
struct ExtractingGuard<'a>(&'a mut bool);

impl<'a> ExtractingGuard<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for ExtractingGuard<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

struct ActiveImage {
    url: String,
    buffer: Arc<PixelBuffer>,
}

/// Eyedropper and palette state for one editing session.
///
/// Invariant: `active_index` is `None` whenever the palette is empty, and
/// when set it indexes into the palette.
pub struct ColorSamplingSession {
    loader: PixelLoader,
    palette: Vec<SampledColor>,
    active_index: Option<usize>,
    dominant_colors: Vec<SampledColor>,
    is_extracting: bool,
    hover_color: Option<SampledColor>,
    active_image: Option<ActiveImage>,
}

impl ColorSamplingSession {
    pub fn new(loader: PixelLoader) -> Self {
        Self {
            loader,
            palette: Vec::new(),
            active_index: None,
            dominant_colors: Vec::new(),
            is_extracting: false,
            hover_color: None,
            active_image: None,
        }
    }

    pub fn palette(&self) -> &[SampledColor] {
        &self.palette
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn active_color(&self) -> Option<&SampledColor> {
        self.active_index.and_then(|i| self.palette.get(i))
    }

    pub fn dominant_colors(&self) -> &[SampledColor] {
        &self.dominant_colors
    }

    pub fn is_extracting(&self) -> bool {
        self.is_extracting
    }

    pub fn hover_color(&self) -> Option<&SampledColor> {
        self.hover_color.as_ref()
    }

    /// URL of the image currently loaded for sampling
    pub fn active_url(&self) -> Option<&str> {
        self.active_image.as_ref().map(|a| a.url.as_str())
    }

    /// Append a color and make it active
    pub fn add_color(&mut self, color: SampledColor) {
        self.palette.push(color);
        self.active_index = Some(self.palette.len() - 1);
    }

    /// Remove the color at `index`; out-of-range indices are ignored.
    pub fn remove_color(&mut self, index: usize) -> Option<SampledColor> {
        if index >= self.palette.len() {
            return None;
        }
        let removed = self.palette.remove(index);

        self.active_index = match self.active_index {
            _ if self.palette.is_empty() => None,
            Some(active) if active == index => Some(index.min(self.palette.len() - 1)),
            Some(active) if active > index => Some(active - 1),
            other => other,
        };
        Some(removed)
    }

    /// Select a palette entry, or clear the selection with `None`.
    /// An index past the end of the palette is ignored.
    pub fn set_active_index(&mut self, index: Option<usize>) {
        if let Some(i) = index.filter(|&i| i >= self.palette.len()) {
            tracing::warn!(index = i, len = self.palette.len(), "Ignoring out-of-range active index");
            return;
        }
        self.active_index = index;
    }

    pub fn set_hover_color(&mut self, color: Option<SampledColor>) {
        self.hover_color = color;
    }

    /// The color to show in the preview swatch: hover wins over the selection.
    pub fn display_color(&self) -> Option<&SampledColor> {
        self.hover_color.as_ref().or_else(|| self.active_color())
    }

    pub fn set_dominant_colors(&mut self, colors: Vec<SampledColor>) {
        self.dominant_colors = colors;
    }

    /// Extract dominant colors from `url`, replacing the current set.
    ///
    /// `is_extracting` is raised for the duration and cleared on success,
    /// failure, and when the future is dropped early. On failure the
    /// previous dominant colors are kept.
    pub async fn extract_dominant_colors(
        &mut self,
        url: &str,
        count: usize,
    ) -> Result<&[SampledColor], ExtractionError> {
        let guard = ExtractingGuard::raise(&mut self.is_extracting);

        let result = match &self.active_image {
            Some(active) if active.url == url => {
                extract_from_buffer(active.buffer.clone(), count).await
            }
            _ => extract_dominant_colors(&self.loader, url, count).await,
        };
        drop(guard);

        match result {
            Ok(colors) => {
                tracing::info!(url = %url, count = colors.len(), "Extracted dominant colors");
                self.dominant_colors = colors;
                Ok(&self.dominant_colors)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Dominant color extraction failed");
                Err(e)
            }
        }
    }

    /// Append dominant colors not already in the palette (by hex) and make
    /// the last one active. Returns how many were added.
    pub fn add_dominant_to_palette(&mut self) -> usize {
        let mut added = 0;
        for color in &self.dominant_colors {
            if self.palette.iter().any(|c| c.hex() == color.hex()) {
                continue;
            }
            self.palette.push(color.clone());
            added += 1;
        }
        if added > 0 {
            self.active_index = Some(self.palette.len() - 1);
        }
        added
    }

    pub fn clear_palette(&mut self) {
        self.palette.clear();
        self.active_index = None;
    }

    /// Clear the palette, dominant colors and hover preview
    pub fn clear_all(&mut self) {
        self.clear_palette();
        self.dominant_colors.clear();
        self.hover_color = None;
    }

    /// Load `url` as the image under the eyedropper.
    ///
    /// The previous buffer and its dominant colors are discarded once the
    /// new image has decoded; on failure the session is left untouched.
    pub async fn set_active_image(&mut self, url: &str) -> Result<(), ImageLoadError> {
        let buffer = self.loader.load(url).await?;
        self.active_image = Some(ActiveImage {
            url: url.to_string(),
            buffer: Arc::new(buffer),
        });
        self.dominant_colors.clear();
        self.hover_color = None;
        Ok(())
    }

    /// Drop the active image and everything derived from it
    pub fn clear_active_image(&mut self) {
        self.active_image = None;
        self.dominant_colors.clear();
        self.hover_color = None;
    }

    /// Sample the active image at native pixel coordinates
    pub fn sample_at(&self, x: f64, y: f64) -> Option<SampledColor> {
        let buffer = &self.active_image.as_ref()?.buffer;
        let rgb = buffer.get_pixel_color(x, y);
        Some(SampledColor::with_position(
            rgb,
            buffer.normalized_position(x, y),
        ))
    }

    /// Update the hover preview from the pixel under the pointer
    pub fn hover_at(&mut self, x: f64, y: f64) -> Option<&SampledColor> {
        let sampled = self.sample_at(x, y)?;
        self.hover_color = Some(sampled);
        self.hover_color.as_ref()
    }

    /// Add the pixel under the pointer to the palette, returning its index
    pub fn pick_at(&mut self, x: f64, y: f64) -> Option<usize> {
        let sampled = self.sample_at(x, y)?;
        tracing::debug!(hex = sampled.hex(), x, y, "Picked color");
        self.add_color(sampled);
        self.active_index
    }

    /// Redraw `magnifier` around the pointer. Returns `false` without an
    /// active image.
    pub fn render_magnifier(&self, magnifier: &mut Magnifier, x: f64, y: f64) -> bool {
        match &self.active_image {
            Some(active) => {
                magnifier.draw(active.buffer.as_ref(), x, y);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryImageSource;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(image: &RgbaImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn session_with(images: Vec<(&str, RgbaImage)>) -> ColorSamplingSession {
        let source = images
            .into_iter()
            .fold(InMemoryImageSource::new(), |source, (url, image)| {
                source.with_image(url, png_bytes(&image))
            });
        ColorSamplingSession::new(PixelLoader::new(Arc::new(source)))
    }

    fn empty_session() -> ColorSamplingSession {
        session_with(Vec::new())
    }

    fn color(r: u8, g: u8, b: u8) -> SampledColor {
        SampledColor::new(Rgb::new(r, g, b))
    }

    fn assert_active_invariant(session: &ColorSamplingSession) {
        match session.active_index() {
            None => assert!(session.palette().is_empty()),
            Some(i) => assert!(i < session.palette().len()),
        }
    }

    #[test]
    fn test_add_color_activates_last() {
        let mut session = empty_session();
        session.add_color(color(1, 1, 1));
        session.add_color(color(2, 2, 2));
        assert_eq!(session.active_index(), Some(1));
        assert_eq!(session.active_color().unwrap().hex(), "#020202");
    }

    #[test]
    fn test_remove_color_adjusts_active_index() {
        let mut session = empty_session();
        for v in 0..4 {
            session.add_color(color(v, v, v));
        }

        // Removing before the active entry shifts it down
        session.set_active_index(Some(2));
        session.remove_color(0);
        assert_eq!(session.active_index(), Some(1));

        // Removing the active last entry clamps to the new last
        session.set_active_index(Some(2));
        session.remove_color(2);
        assert_eq!(session.active_index(), Some(1));

        // Removing after the active entry leaves it alone
        session.set_active_index(Some(0));
        session.remove_color(1);
        assert_eq!(session.active_index(), Some(0));

        session.remove_color(0);
        assert_eq!(session.active_index(), None);
        assert!(session.palette().is_empty());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut session = empty_session();
        session.add_color(color(9, 9, 9));
        assert!(session.remove_color(5).is_none());
        assert_eq!(session.palette().len(), 1);
        assert_eq!(session.active_index(), Some(0));
    }

    #[test]
    fn test_active_invariant_over_mixed_sequence() {
        let mut session = empty_session();
        let ops: [(bool, usize); 12] = [
            (true, 0),
            (true, 0),
            (false, 0),
            (true, 0),
            (true, 0),
            (false, 2),
            (false, 7),
            (true, 0),
            (false, 1),
            (false, 0),
            (false, 0),
            (false, 0),
        ];
        for (i, (add, index)) in ops.into_iter().enumerate() {
            if add {
                session.add_color(color(i as u8, 0, 0));
            } else {
                session.remove_color(index);
            }
            assert_active_invariant(&session);
        }
    }

    #[test]
    fn test_set_active_index_ignores_out_of_range() {
        let mut session = empty_session();
        session.set_active_index(Some(0));
        assert_eq!(session.active_index(), None);

        session.add_color(color(1, 2, 3));
        session.add_color(color(4, 5, 6));
        session.set_active_index(Some(0));
        assert_eq!(session.active_index(), Some(0));
        session.set_active_index(Some(2));
        assert_eq!(session.active_index(), Some(0));
    }

    #[test]
    fn test_set_active_index_none_deselects() {
        let mut session = empty_session();
        session.add_color(color(1, 2, 3));
        session.add_color(color(4, 5, 6));

        session.set_active_index(None);
        assert_eq!(session.active_index(), None);
        assert!(session.active_color().is_none());
        assert_eq!(session.palette().len(), 2);

        // Removing with nothing selected keeps nothing selected
        session.remove_color(0);
        assert_eq!(session.active_index(), None);

        session.add_color(color(7, 8, 9));
        assert_eq!(session.active_index(), Some(1));
    }

    #[test]
    fn test_display_color_prefers_hover() {
        let mut session = empty_session();
        assert!(session.display_color().is_none());

        session.add_color(color(10, 10, 10));
        assert_eq!(session.display_color().unwrap().hex(), "#0A0A0A");

        session.set_hover_color(Some(color(255, 255, 255)));
        assert_eq!(session.display_color().unwrap().hex(), "#FFFFFF");

        session.set_hover_color(None);
        assert_eq!(session.display_color().unwrap().hex(), "#0A0A0A");
    }

    #[test]
    fn test_add_dominant_to_palette_dedups_and_is_idempotent() {
        let mut session = empty_session();
        session.add_color(color(255, 0, 0));
        session.set_dominant_colors(vec![color(255, 0, 0), color(0, 0, 255), color(0, 255, 0)]);

        assert_eq!(session.add_dominant_to_palette(), 2);
        assert_eq!(session.palette().len(), 3);
        assert_eq!(session.active_index(), Some(2));

        session.set_active_index(Some(0));
        assert_eq!(session.add_dominant_to_palette(), 0);
        assert_eq!(session.palette().len(), 3);
        assert_eq!(session.active_index(), Some(0));
    }

    #[test]
    fn test_clear_all() {
        let mut session = empty_session();
        session.add_color(color(1, 1, 1));
        session.set_dominant_colors(vec![color(2, 2, 2)]);
        session.set_hover_color(Some(color(3, 3, 3)));

        session.clear_palette();
        assert!(session.palette().is_empty());
        assert_eq!(session.active_index(), None);
        assert_eq!(session.dominant_colors().len(), 1);

        session.clear_all();
        assert!(session.dominant_colors().is_empty());
        assert!(session.hover_color().is_none());
    }

    #[test]
    fn test_dominant_colors_skips_near_white_and_transparent() {
        let image = RgbaImage::from_fn(20, 20, |x, _| {
            if x < 10 {
                Rgba([250, 250, 250, 255])
            } else {
                Rgba([200, 0, 0, 100])
            }
        });
        assert!(dominant_colors(&PixelBuffer::new(image), 8).is_empty());
    }

    #[test]
    fn test_dominant_colors_downsamples_large_images() {
        let image = RgbaImage::from_pixel(600, 300, Rgba([40, 90, 160, 255]));
        let colors = dominant_colors(&PixelBuffer::new(image), 8);
        // Uniform image: every sample is identical, so one box remains
        assert_eq!(colors, vec![Rgb::new(40, 90, 160)]);
    }

    #[tokio::test]
    async fn test_extract_two_color_image() {
        let image = RgbaImage::from_fn(100, 100, |x, _| {
            if x < 50 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let mut session = session_with(vec![("mem://flag", image)]);

        let colors = session.extract_dominant_colors("mem://flag", 8).await.unwrap();
        let hexes: Vec<&str> = colors.iter().map(|c| c.hex()).collect();
        assert_eq!(hexes, vec!["#0000FF", "#FF0000"]);
        assert!(!session.is_extracting());
    }

    #[tokio::test]
    async fn test_extract_failure_keeps_previous_and_clears_flag() {
        let mut session = empty_session();
        session.set_dominant_colors(vec![color(1, 2, 3)]);

        let result = session.extract_dominant_colors("mem://missing", 8).await;
        assert!(matches!(
            result,
            Err(ExtractionError::Load(ImageLoadError::NotFound(_)))
        ));
        assert!(!session.is_extracting());
        assert_eq!(session.dominant_colors().len(), 1);
    }

    #[tokio::test]
    async fn test_eyedropper_flow() {
        let image = RgbaImage::from_fn(10, 10, |x, y| Rgba([x as u8 * 20, y as u8 * 20, 0, 255]));
        let mut session = session_with(vec![("mem://grid", image)]);

        assert!(session.sample_at(1.0, 1.0).is_none());
        session.set_active_image("mem://grid").await.unwrap();
        assert_eq!(session.active_url(), Some("mem://grid"));

        let hovered = session.hover_at(3.7, 5.2).unwrap();
        assert_eq!(hovered.rgb(), Rgb::new(60, 100, 0));
        let position = hovered.position().unwrap();
        assert!((position.x - 0.37).abs() < 1e-9);

        assert_eq!(session.pick_at(100.0, 0.0), Some(0));
        assert_eq!(session.palette()[0].rgb(), Rgb::new(180, 0, 0));

        let mut magnifier = Magnifier::new().unwrap();
        assert!(session.render_magnifier(&mut magnifier, 5.0, 5.0));
    }

    #[tokio::test]
    async fn test_changing_image_discards_dominant_colors() {
        let red = RgbaImage::from_pixel(4, 4, Rgba([200, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 200, 255]));
        let mut session = session_with(vec![("mem://red", red), ("mem://blue", blue)]);

        session.set_active_image("mem://red").await.unwrap();
        session.extract_dominant_colors("mem://red", 4).await.unwrap();
        assert_eq!(session.dominant_colors()[0].hex(), "#C80000");

        session.set_active_image("mem://blue").await.unwrap();
        assert!(session.dominant_colors().is_empty());
        assert_eq!(session.sample_at(0.0, 0.0).unwrap().hex(), "#0000C8");

        // A failed switch leaves the current image in place
        assert!(session.set_active_image("mem://gone").await.is_err());
        assert_eq!(session.active_url(), Some("mem://blue"));
    }
}
