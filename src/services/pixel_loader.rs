use std::sync::Arc;

use crate::error::ImageLoadError;
use crate::rendering::PixelBuffer;

use super::image_source::ImageSource;

/// Loads images by URL into decoded [`PixelBuffer`]s.
#[derive(Clone)]
pub struct PixelLoader {
    source: Arc<dyn ImageSource>,
}

impl PixelLoader {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self { source }
    }

    /// Fetch and decode an image at its natural resolution.
    ///
    /// Decoding runs on the blocking pool. The buffer is returned only once
    /// it is complete.
    pub async fn load(&self, url: &str) -> Result<PixelBuffer, ImageLoadError> {
        let bytes = self.source.fetch(url).await?;

        let buffer = tokio::task::spawn_blocking(move || decode(&bytes))
            .await
            .map_err(|e| ImageLoadError::Task(e.to_string()))??;

        tracing::info!(
            url = %url,
            width = buffer.width(),
            height = buffer.height(),
            "Loaded pixel buffer"
        );
        Ok(buffer)
    }
}

/// Decode PNG, JPEG, WebP, GIF or BMP bytes into RGBA8.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, ImageLoadError> {
    let image = image::load_from_memory(bytes)?;
    Ok(PixelBuffer::new(image.to_rgba8()))
}
