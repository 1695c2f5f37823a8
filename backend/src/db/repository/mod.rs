//! Repository trait definitions for catalog queries.
//!
//! - [`error`]: Error types for repository operations
//!
//! The query endpoints only ever read: a repository answers cone searches and
//! identifier lookups against the stacked sdss_id table and returns rows
//! verbatim. Implementations live in [`crate::db::repositories`].

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{CatalogId, ConeSearch, SdssId, Target};

/// Read-only access to catalog targets.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait TargetRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Targets within the cone's radius of its center.
    ///
    /// Sexagesimal centers are converted by the implementation; a malformed
    /// center is a `ValidationError`.
    async fn cone_search(&self, cone: &ConeSearch) -> RepositoryResult<Vec<Target>>;

    /// Targets with the given `sdss_id`.
    async fn get_targets_by_sdss_id(&self, sdss_id: SdssId) -> RepositoryResult<Vec<Target>>;

    /// Targets where any cross-match catalog id equals `catalog_id`.
    async fn get_targets_by_catalog_id(
        &self,
        catalog_id: CatalogId,
    ) -> RepositoryResult<Vec<Target>>;
}
