//! Fetching contract metadata from its static location

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use super::ContractMetadata;
use crate::lazy::Lazy;
use crate::SdkError;

/// Source of the raw metadata JSON
#[async_trait]
pub trait MetadataLoader: Send + Sync {
    /// Fetch the metadata document
    async fn load(&self) -> Result<String, SdkError>;

    /// Where the document comes from, for logging
    fn location(&self) -> String;
}

/// Loads metadata over HTTP(S)
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpMetadataLoader {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpMetadataLoader {
    /// Loader for `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl MetadataLoader for HttpMetadataLoader {
    async fn load(&self) -> Result<String, SdkError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SdkError::ResourceUnavailable(format!("{}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SdkError::ResourceUnavailable(format!(
                "failed to load contract metadata from {}: HTTP {}",
                self.url, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SdkError::ResourceUnavailable(format!("{}: {}", self.url, e)))
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Loads metadata from the local filesystem
#[derive(Debug, Clone)]
pub struct FileMetadataLoader {
    path: PathBuf,
}

impl FileMetadataLoader {
    /// Loader for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetadataLoader for FileMetadataLoader {
    async fn load(&self) -> Result<String, SdkError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SdkError::ResourceUnavailable(format!(
                "failed to load contract metadata from {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serves an in-memory document
#[derive(Debug, Clone)]
pub struct StaticMetadataLoader {
    json: String,
}

impl StaticMetadataLoader {
    /// Loader that always returns `json`
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

#[async_trait]
impl MetadataLoader for StaticMetadataLoader {
    async fn load(&self) -> Result<String, SdkError> {
        Ok(self.json.clone())
    }

    fn location(&self) -> String {
        "<static>".to_string()
    }
}

/// Pick a loader for `location`: HTTP(S) URLs are fetched, anything else is a path
pub fn loader_for(location: &str) -> Arc<dyn MetadataLoader> {
    #[cfg(feature = "http")]
    if location.starts_with("http://") || location.starts_with("https://") {
        return Arc::new(HttpMetadataLoader::new(location));
    }
    Arc::new(FileMetadataLoader::new(location))
}

/// Owns the lazily loaded metadata of an application
pub struct MetadataProvider {
    inner: Lazy<ContractMetadata>,
}

impl MetadataProvider {
    /// Provider backed by `loader`
    pub fn new(loader: Arc<dyn MetadataLoader>) -> Self {
        Self {
            inner: Lazy::new(move || {
                let loader = loader.clone();
                async move {
                    let location = loader.location();
                    tracing::debug!(%location, "loading contract metadata");
                    let json = loader.load().await?;
                    let metadata = ContractMetadata::from_json(&json)?;
                    tracing::debug!(
                        %location,
                        messages = metadata.messages().len(),
                        types = metadata.registry().len(),
                        "contract metadata loaded"
                    );
                    Ok(metadata)
                }
            }),
        }
    }

    /// The parsed metadata, loaded on first call
    pub async fn metadata(&self) -> Result<Arc<ContractMetadata>, SdkError> {
        self.inner.get().await
    }

    /// Returns `true` once metadata has loaded
    pub fn is_loaded(&self) -> bool {
        self.inner.is_initialized()
    }
}

impl std::fmt::Debug for MetadataProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataProvider")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
