use crate::{Result, SourceError};
use async_trait::async_trait;
use flowmap_protocol::{parse_dataset_slice, AttentionDataset, DataSourceRecord};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches and decodes the attention payload behind a data source.
#[async_trait]
pub trait DatasetLoader: Send + Sync {
    async fn load(&self, source: &DataSourceRecord) -> Result<AttentionDataset>;
}

/// Loads `http(s)://` urls over the network and anything else from disk.
/// Relative paths resolve against `base_dir` when one is set.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    client: Client,
    base_dir: Option<PathBuf>,
}

impl SourceLoader {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_dir: None,
        })
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    async fn fetch(&self, source: &DataSourceRecord) -> Result<Vec<u8>> {
        let url = source.url.trim();
        if source.is_remote() {
            log::debug!("GET {url}");
            let response = self.client.get(url).send().await?.error_for_status()?;
            return Ok(response.bytes().await?.to_vec());
        }
        let path = self.resolve(url);
        log::debug!("reading {}", path.display());
        Ok(tokio::fs::read(&path).await?)
    }

    fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location.strip_prefix("file://").unwrap_or(location));
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[async_trait]
impl DatasetLoader for SourceLoader {
    async fn load(&self, source: &DataSourceRecord) -> Result<AttentionDataset> {
        let bytes = self.fetch(source).await?;
        let dataset = parse_dataset_slice(&bytes).map_err(|err| SourceError::Parse {
            origin: source.name.clone(),
            message: format!("{err:#}"),
        })?;
        log::info!(
            "loaded '{}': {} input tokens, {} output tokens, {} attention records",
            source.name,
            dataset.input_tokens.len(),
            dataset.output_tokens.len(),
            dataset.attention_records.len()
        );
        Ok(dataset)
    }
}
