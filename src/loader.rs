//! Fetching the gallery catalog and tracking the result.
//!
//! The catalog lives at one fixed location per build: [`CATALOG_FILE`] in the
//! content root, unless `[gallery] catalog` in `config.toml` points somewhere
//! else (another file, or an `http(s)://` URL). A load is a single attempt:
//! fetch, parse, done. There is no retry and nothing is cached between
//! loads.
//!
//! [`LoadState`] is what the rest of the site sees. It is `Loading` only
//! while a load is in flight and settles into exactly one of `Failed` or
//! `Ready`.

use crate::catalog::{self, Catalog, ParseError};
use crate::notice::Notice;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default catalog file name, relative to the content root.
pub const CATALOG_FILE: &str = "gallery-config.xml";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read gallery configuration {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to fetch gallery configuration: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to load gallery configuration: HTTP {status} from {url}")]
    Status { url: Url, status: u16 },
    #[error("XML parsing error: {0}")]
    Parse(#[from] ParseError),
}

/// Where the catalog document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Path(PathBuf),
    Url(Url),
}

impl CatalogSource {
    /// Resolve a configured location against the content root.
    ///
    /// `http://` and `https://` locations are fetched over the network;
    /// anything else is a path relative to `root`.
    pub fn resolve(root: &Path, location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Url(url),
            _ => Self::Path(root.join(location)),
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Fetch the raw document text.
pub async fn fetch(source: &CatalogSource) -> Result<String, LoadError> {
    match source {
        CatalogSource::Path(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read {
                    path: path.clone(),
                    source,
                })
        }
        CatalogSource::Url(url) => {
            let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            Ok(response.text().await?)
        }
    }
}

/// Fetch and parse the catalog.
pub async fn load(source: &CatalogSource) -> Result<Catalog, LoadError> {
    tracing::debug!(%source, "loading gallery catalog");
    let text = fetch(source).await?;
    let catalog = catalog::parse_catalog(&text)?;

    for id in catalog.duplicate_category_ids() {
        tracing::warn!(category = id, "category id declared more than once");
    }
    for item in catalog.orphans() {
        if !item.category.is_empty() {
            tracing::warn!(item = %item.id, category = %item.category, "image references an undeclared category");
        }
    }
    tracing::info!(
        categories = catalog.categories.len(),
        images = catalog.items.len(),
        "gallery catalog loaded"
    );
    Ok(catalog)
}

/// Observable outcome of a catalog load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Failed { message: String },
    Ready { catalog: Catalog },
}

impl LoadState {
    /// Run one load and settle on its result.
    pub async fn resolve(source: &CatalogSource) -> Self {
        Self::settle(load(source).await)
    }

    pub fn settle(result: Result<Catalog, LoadError>) -> Self {
        match result {
            Ok(catalog) => Self::Ready { catalog },
            Err(e) => {
                tracing::warn!(error = %e, "gallery catalog unavailable");
                Self::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&Catalog> {
        match self {
            Self::Ready { catalog } => Some(catalog),
            _ => None,
        }
    }
    /// Error notice for the page, if the load failed.
    pub fn notice(&self) -> Option<Notice> {
        self.error()
            .map(|message| Notice::error("Error loading gallery", message))
    }
}
