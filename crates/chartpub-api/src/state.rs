//! # Application State
//!
//! Shared state for the Axum application.

use std::sync::Arc;

use chartpub_publisher::Publisher;

/// Default request body limit for chart uploads.
pub const DEFAULT_MAX_CHART_BYTES: usize = 32 * 1024 * 1024;

struct Inner {
    publisher: Publisher,
    max_chart_bytes: usize,
}

/// Shared application state passed to all route handlers.
///
/// Cheap to clone; all clones share one publisher and its cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new(publisher: Publisher) -> Self {
        Self::with_limit(publisher, DEFAULT_MAX_CHART_BYTES)
    }

    pub fn with_limit(publisher: Publisher, max_chart_bytes: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                publisher,
                max_chart_bytes,
            }),
        }
    }

    pub fn publisher(&self) -> &Publisher {
        &self.inner.publisher
    }

    /// Largest accepted upload body, in bytes.
    pub fn max_chart_bytes(&self) -> usize {
        self.inner.max_chart_bytes
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("publisher", &self.inner.publisher)
            .field("max_chart_bytes", &self.inner.max_chart_bytes)
            .finish()
    }
}
