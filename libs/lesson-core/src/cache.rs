//! Memoizing resource cache.
//!
//! Values are loaded at most once per key. Concurrent callers for the same key
//! wait on a single in-flight load; a failed load leaves the slot empty so the
//! next caller tries again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use crate::course::{CourseContent, CourseIndex, UnitLessonData};
use crate::resolver::{LessonManifest, LessonSource};

/// A keyed, coalescing, success-only cache.
#[derive(Debug)]
pub struct ResourceCache<T> {
    slots: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> ResourceCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, running `loader` if it is absent.
    pub async fn get_or_load<E, F, Fut>(&self, key: &str, loader: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cell = {
            let mut slots = self.slots.lock().await;
            slots.entry(key.to_string()).or_default().clone()
        };

        if let Some(value) = cell.get() {
            debug!(key, "cache hit");
            return Ok(value.clone());
        }

        cell.get_or_try_init(loader).await.cloned()
    }

    /// Whether a successful value is stored for `key`.
    pub async fn contains(&self, key: &str) -> bool {
        let slots = self.slots.lock().await;
        slots.get(key).is_some_and(|cell| cell.initialized())
    }

    /// Drop every cached value.
    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }
}

/// The caches shared by the course loader and the vocabulary resolver.
#[derive(Debug, Default)]
pub struct ContentCache {
    pub course: ResourceCache<Arc<CourseContent>>,
    pub course_index: ResourceCache<Arc<CourseIndex>>,
    pub unit_lessons: ResourceCache<Arc<UnitLessonData>>,
    pub manifest: ResourceCache<Arc<LessonManifest>>,
    pub lessons: ResourceCache<Arc<LessonSource>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clear(&self) {
        self.course.clear().await;
        self.course_index.clear().await;
        self.unit_lessons.clear().await;
        self.manifest.clear().await;
        self.lessons.clear().await;
    }
}
