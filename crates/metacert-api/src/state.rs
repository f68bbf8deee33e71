//! Shared application state, injected at router construction.

use std::sync::Arc;

use metacert_pin::Publisher;

/// State shared across handlers. The publisher owns the pinning client
/// and its credentials — handlers hold no configuration of their own.
#[derive(Clone)]
pub struct AppState {
    /// Content publisher for the upload surface.
    pub publisher: Arc<Publisher>,
}

impl AppState {
    /// Build state around a configured publisher.
    pub fn new(publisher: Publisher) -> Self {
        Self {
            publisher: Arc::new(publisher),
        }
    }
}
