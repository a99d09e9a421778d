use crate::domain::RawPayload;
use crate::error::{DevlogError, Result};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::{Client, Url};
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info};

/// Where the feed document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Remote(Url),
    Local(PathBuf),
}

impl FeedSource {
    /// `http://` and `https://` locations are fetched; anything else is a file path.
    pub fn parse(location: &str) -> Result<Self> {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location)
                .map_err(|e| DevlogError::Other(format!("Invalid feed URL {location}: {e}")))?;
            Ok(FeedSource::Remote(url))
        } else {
            Ok(FeedSource::Local(PathBuf::from(location)))
        }
    }

    /// Base URL for resolving relative image paths, when the feed is remote.
    pub fn base_url(&self) -> Option<&Url> {
        match self {
            FeedSource::Remote(url) => Some(url),
            FeedSource::Local(_) => None,
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Remote(url) => write!(f, "{url}"),
            FeedSource::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

pub struct FeedClient {
    client: Client,
    source: FeedSource,
}

impl FeedClient {
    pub fn new(client: Client, source: FeedSource) -> Self {
        Self { client, source }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    /// Fetches the feed once, bypassing caches. No retries.
    pub async fn load(&self) -> Result<RawPayload> {
        info!("Loading feed from {}", self.source);
        let body = match &self.source {
            FeedSource::Remote(url) => self.fetch(url).await?,
            FeedSource::Local(path) => tokio::fs::read_to_string(path).await?,
        };
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            error!("Feed request error: Status {}", response.status());
            return Err(DevlogError::Status(response.status()));
        }

        Ok(response.text().await?)
    }
}
