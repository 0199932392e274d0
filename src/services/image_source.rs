use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::ImageLoadError;
use crate::models::FetchConfig;

/// Anything that can turn an image URL into its encoded bytes
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError>;
}

/// Fetches `http(s)://` URLs over the network and reads `file://` URLs or
/// bare paths from disk.
pub struct HttpImageSource {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpImageSource {
    pub fn new(config: &FetchConfig) -> Result<Self, ImageLoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ImageLoadError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        let fetch_error = |e: reqwest::Error| ImageLoadError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let mut response = self.client.get(url).send().await.map_err(fetch_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Image fetch failed");
            return Err(ImageLoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(len) = response.content_length() {
            self.check_size(len as usize)?;
        }

        // Content-Length may be absent or wrong; enforce the limit while reading
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(fetch_error)? {
            body.extend_from_slice(&chunk);
            self.check_size(body.len())?;
        }

        tracing::debug!(url = %url, bytes = body.len(), "Fetched image");
        Ok(body)
    }

    async fn fetch_file(&self, url: &str, path: &Path) -> Result<Vec<u8>, ImageLoadError> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImageLoadError::NotFound(url.to_string()),
            _ => ImageLoadError::Io(e),
        })?;
        self.check_size(metadata.len() as usize)?;

        let data = tokio::fs::read(path).await?;
        tracing::debug!(path = %path.display(), bytes = data.len(), "Read image file");
        Ok(data)
    }

    fn check_size(&self, size: usize) -> Result<(), ImageLoadError> {
        if size > self.max_bytes {
            return Err(ImageLoadError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            self.fetch_http(url).await
        } else if let Some(path) = url.strip_prefix("file://") {
            self.fetch_file(url, Path::new(path)).await
        } else {
            self.fetch_file(url, Path::new(url)).await
        }
    }
}

/// Image bytes held in memory, keyed by URL
pub struct InMemoryImageSource {
    images: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageSource {
    pub fn new() -> Self {
        Self {
            images: RwLock::new(HashMap::new()),
        }
    }

    /// Builder-style registration, for setting up fixtures
    pub fn with_image(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.images.get_mut().insert(url.into(), bytes);
        self
    }

    pub async fn insert(&self, url: impl Into<String>, bytes: Vec<u8>) {
        self.images.write().await.insert(url.into(), bytes);
    }
}

impl Default for InMemoryImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for InMemoryImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageLoadError> {
        let images = self.images.read().await;
        images
            .get(url)
            .cloned()
            .ok_or_else(|| ImageLoadError::NotFound(url.to_string()))
    }
}
