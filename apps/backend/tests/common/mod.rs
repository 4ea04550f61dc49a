//! Common test utilities for integration tests.
//!
//! Each [`TestContext`] writes the fixture course into its own temporary
//! content directory and serves it through the real router.

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use bashalanka_backend::{router, AppState};
use lesson_core::{ContentFetcher, DirectoryFetcher, ExerciseSettings};

/// Test context holding the content directory and router.
pub struct TestContext {
    dir: TempDir,
    app: Router,
}

impl TestContext {
    /// Create a context over the fixture course.
    pub fn new() -> Self {
        Self::with_settings(ExerciseSettings::default())
    }

    pub fn with_settings(settings: ExerciseSettings) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create content directory");
        fixtures::write_course(dir.path());
        Self::over(dir, settings)
    }

    /// Create a context over an empty content directory.
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create content directory");
        Self::over(dir, ExerciseSettings::default())
    }

    fn over(dir: TempDir, settings: ExerciseSettings) -> Self {
        let fetcher = ContentFetcher::Directory(DirectoryFetcher::new(dir.path()));
        let app = router(AppState::new(fetcher, settings));
        Self { dir, app }
    }

    pub fn content_dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }
}
