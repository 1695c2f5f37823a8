//! Data Transfer Objects for the HTTP API.
//!
//! Route-specific request types live in [`crate::routes`] and are re-exported
//! here next to the server-only responses.

use serde::{Deserialize, Serialize};

pub use crate::routes::paths::{PathBody, PathKeywords, PathsQuery};
pub use crate::routes::query::{CatalogIdQuery, ConeQuery, SdssIdQuery};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Catalog database status
    pub database: String,
}
