use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::FetchConfig;
use crate::domain::FeatureCollection;

/// Why a dataset could not be loaded
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid GeoJSON from {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Where a dataset lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, anything else a file path
    /// resolved against `base_dir` when relative.
    pub fn resolve(location: &str, base_dir: &Path) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            return DataSource::Url(location.to_string());
        }
        let path = Path::new(location);
        if path.is_absolute() {
            DataSource::File(path.to_path_buf())
        } else {
            DataSource::File(base_dir.join(path))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Loads GeoJSON FeatureCollections from disk or over HTTP
pub struct Fetcher {
    client: reqwest::blocking::Client,
    base_dir: PathBuf,
}

impl Fetcher {
    pub fn new(config: &FetchConfig, base_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_dir: base_dir.into(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn fetch(&self, location: &str) -> Result<FeatureCollection, FetchError> {
        let source = DataSource::resolve(location, &self.base_dir);
        debug!(%source, "fetching GeoJSON");

        let body = match &source {
            DataSource::File(path) => std::fs::read_to_string(path).map_err(|e| FetchError::Io {
                path: path.clone(),
                source: e,
            })?,
            DataSource::Url(url) => self.fetch_url(url)?,
        };

        parse_feature_collection(&body, &source.to_string())
    }

    fn fetch_url(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })
    }
}

pub fn parse_feature_collection(body: &str, location: &str) -> Result<FeatureCollection, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Parse {
        location: location.to_string(),
        source: e,
    })
}
