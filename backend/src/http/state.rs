//! Application state for the HTTP server.

use std::sync::Arc;

use crate::access::PathRegistry;
use crate::db::repository::TargetRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Path template registry for the `/paths` routes
    pub registry: Arc<dyn PathRegistry>,
    /// Catalog repository for the `/query` routes
    pub repository: Arc<dyn TargetRepository>,
}

impl AppState {
    /// Create a new application state from its collaborators.
    pub fn new(registry: Arc<dyn PathRegistry>, repository: Arc<dyn TargetRepository>) -> Self {
        Self {
            registry,
            repository,
        }
    }
}
