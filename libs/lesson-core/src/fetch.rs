//! Resource fetching for course assets.
//!
//! Paths are relative to a content root (`course.map.json`,
//! `sections/section-01/words.yaml`, `lessons/.../lesson-01.md`). The
//! [`ResourceFetcher`] seam lets the loader and resolver run against a local
//! directory, a static web host, or an in-memory map in tests.

use serde::de::DeserializeOwned;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::LoadError;

/// Fetches text resources by content-relative path.
pub trait ResourceFetcher: Send + Sync {
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Fetch and decode a JSON resource.
pub async fn fetch_json<F, T>(fetcher: &F, path: &str) -> Result<T, LoadError>
where
    F: ResourceFetcher + ?Sized,
    T: DeserializeOwned,
{
    let text = fetcher.fetch_text(path).await?;
    serde_json::from_str(&text).map_err(|e| LoadError::Json {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Run `fut`, converting an elapsed deadline into [`LoadError::Timeout`].
pub async fn with_timeout<T>(
    path: &str,
    timeout: Option<Duration>,
    fut: impl Future<Output = Result<T, LoadError>>,
) -> Result<T, LoadError> {
    match timeout {
        None => fut.await,
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| LoadError::Timeout {
                path: path.to_string(),
                millis: limit.as_millis() as u64,
            })?,
    }
}

/// Reads resources from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
    timeout: Option<Duration>,
}

impl DirectoryFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a relative path onto the root, rejecting escapes.
    fn resolve(&self, path: &str) -> Result<PathBuf, LoadError> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.trim().is_empty() || escapes {
            return Err(LoadError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ResourceFetcher for DirectoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        let full_path = self.resolve(path)?;
        debug!(path = %full_path.display(), "reading resource");
        let read = async {
            tokio::fs::read_to_string(&full_path)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => LoadError::NotFound {
                        path: path.to_string(),
                    },
                    _ => LoadError::Fetch {
                        path: path.to_string(),
                        message: e.to_string(),
                    },
                })
        };
        with_timeout(path, self.timeout, read).await
    }
}

/// Fetches resources from a static web host.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute URLs pass through; relative paths are joined onto the base.
    fn url_for(&self, path: &str) -> String {
        let lower = path.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        let url = self.url_for(path);
        debug!(url = %url, "fetching resource");
        let request = async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| LoadError::Fetch {
                    path: path.to_string(),
                    message: e.to_string(),
                })?;

            let status = resp.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(LoadError::NotFound {
                    path: path.to_string(),
                });
            }
            if !status.is_success() {
                return Err(LoadError::Status {
                    path: path.to_string(),
                    status: status.as_u16(),
                });
            }

            resp.text().await.map_err(|e| LoadError::Fetch {
                path: path.to_string(),
                message: e.to_string(),
            })
        };
        with_timeout(path, self.timeout, request).await
    }
}

/// The fetcher chosen at startup.
#[derive(Debug, Clone)]
pub enum ContentFetcher {
    Directory(DirectoryFetcher),
    Http(HttpFetcher),
}

impl ResourceFetcher for ContentFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, LoadError> {
        match self {
            Self::Directory(fetcher) => fetcher.fetch_text(path).await,
            Self::Http(fetcher) => fetcher.fetch_text(path).await,
        }
    }
}
