//! Server configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use lesson_core::{ContentFetcher, DirectoryFetcher, ExerciseSettings, HttpFetcher};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding `course.map.json`, `sections/` and lesson sources.
    pub content_root: PathBuf,
    /// When set, content is fetched over HTTP instead of from `content_root`.
    pub content_base_url: Option<String>,
    pub fetch_timeout: Option<Duration>,
    pub settings: ExerciseSettings,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Env vars:
    /// - HOST (default 0.0.0.0)
    /// - PORT (default 3000)
    /// - CONTENT_ROOT (default ./content)
    /// - CONTENT_BASE_URL: optional, switches to HTTP fetching
    /// - FETCH_TIMEOUT_MS: optional per-fetch timeout
    /// - EXERCISE_SETTINGS: optional JSON file of exercise setting overrides
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match std::env::var("PORT") {
            Ok(port) => port.parse().context("PORT must be a port number")?,
            Err(_) => 3000,
        };
        let content_root = std::env::var("CONTENT_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./content"));
        let content_base_url = std::env::var("CONTENT_BASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let fetch_timeout = match std::env::var("FETCH_TIMEOUT_MS") {
            Ok(millis) => Some(Duration::from_millis(
                millis.parse().context("FETCH_TIMEOUT_MS must be a number of milliseconds")?,
            )),
            Err(_) => None,
        };
        let settings = match std::env::var("EXERCISE_SETTINGS") {
            Ok(path) => load_settings(&path)?,
            Err(_) => ExerciseSettings::default(),
        };

        Ok(Self {
            host,
            port,
            content_root,
            content_base_url,
            fetch_timeout,
            settings,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The content fetcher this configuration selects.
    pub fn fetcher(&self) -> ContentFetcher {
        match &self.content_base_url {
            Some(url) => {
                ContentFetcher::Http(HttpFetcher::new(url.clone()).with_timeout(self.fetch_timeout))
            }
            None => ContentFetcher::Directory(
                DirectoryFetcher::new(self.content_root.clone()).with_timeout(self.fetch_timeout),
            ),
        }
    }
}

fn load_settings(path: &str) -> anyhow::Result<ExerciseSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exercise settings from {path}"))?;
    ExerciseSettings::from_json(&json).with_context(|| format!("invalid exercise settings in {path}"))
}
