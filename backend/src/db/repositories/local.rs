//! In-memory local repository implementation.
//!
//! Stores targets in a `Vec` behind a lock, providing fast, deterministic and
//! isolated execution for unit tests and local development. Cone searches
//! use a haversine separation in place of the database's spatial index.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, TargetRepository};
use crate::models::{angular_separation, CatalogId, ConeSearch, SdssId, Target};

/// In-memory local repository.
///
/// # Example
/// ```
/// use valis_rust::db::repositories::LocalRepository;
/// use valis_rust::models::{SdssId, Target};
///
/// let repo = LocalRepository::new();
/// repo.insert_target(Target {
///     sdss_id: SdssId::new(1),
///     ra_sdss_id: qtty::Degrees::new(10.0),
///     dec_sdss_id: qtty::Degrees::new(20.0),
///     catalogid21: None,
///     catalogid25: None,
///     catalogid31: None,
/// });
/// assert_eq!(repo.len(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    targets: Vec<Target>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            is_healthy: true,
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `targets`.
    pub fn with_targets(targets: Vec<Target>) -> Self {
        let repo = Self::new();
        if let Ok(mut data) = repo.data.write() {
            data.targets = targets;
        }
        repo
    }

    /// Load targets from a JSON file holding an array of target records.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("Failed to read targets file: {}", e),
                context: ErrorContext::new("load_targets").with_details(path.display().to_string()),
            }
        })?;
        let targets: Vec<Target> = serde_json::from_str(&content).map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("Failed to parse targets file: {}", e),
                context: ErrorContext::new("load_targets").with_details(path.display().to_string()),
            }
        })?;
        log::info!("Loaded {} targets from {}", targets.len(), path.display());
        Ok(Self::with_targets(targets))
    }

    pub fn insert_target(&self, target: Target) {
        if let Ok(mut data) = self.data.write() {
            data.targets.push(target);
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.targets.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Simulate an unreachable backend for health checks.
    pub fn set_healthy(&self, healthy: bool) {
        if let Ok(mut data) = self.data.write() {
            data.is_healthy = healthy;
        }
    }

    fn select<F>(&self, operation: &str, predicate: F) -> RepositoryResult<Vec<Target>>
    where
        F: Fn(&Target) -> bool,
    {
        let data = self.data.read().map_err(|e| {
            RepositoryError::internal_with_context(e.to_string(), ErrorContext::new(operation))
        })?;
        Ok(data.targets.iter().filter(|t| predicate(t)).cloned().collect())
    }
}

#[async_trait]
impl TargetRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().map_err(|e| {
            RepositoryError::internal_with_context(e.to_string(), ErrorContext::new("health_check"))
        })?;
        Ok(data.is_healthy)
    }

    async fn cone_search(&self, cone: &ConeSearch) -> RepositoryResult<Vec<Target>> {
        let (ra, dec) = cone
            .center()
            .map_err(|e| RepositoryError::from(e).with_operation("cone_search"))?;
        let radius = cone.radius_degrees().value();

        log::debug!(
            "Local cone search: ra={} dec={} radius={}deg",
            ra.value(),
            dec.value(),
            radius
        );

        self.select("cone_search", |t| {
            angular_separation(ra, dec, t.ra_sdss_id, t.dec_sdss_id).value() <= radius
        })
    }

    async fn get_targets_by_sdss_id(&self, sdss_id: SdssId) -> RepositoryResult<Vec<Target>> {
        self.select("get_targets_by_sdss_id", |t| t.sdss_id == sdss_id)
    }

    async fn get_targets_by_catalog_id(
        &self,
        catalog_id: CatalogId,
    ) -> RepositoryResult<Vec<Target>> {
        self.select("get_targets_by_catalog_id", |t| t.has_catalog_id(catalog_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchUnits, SkyCoordinate};
    use qtty::Degrees;

    fn target(id: i64, ra: f64, dec: f64, cat: Option<i64>) -> Target {
        Target {
            sdss_id: SdssId::new(id),
            ra_sdss_id: Degrees::new(ra),
            dec_sdss_id: Degrees::new(dec),
            catalogid21: None,
            catalogid25: cat.map(CatalogId::new),
            catalogid31: None,
        }
    }

    fn repo() -> LocalRepository {
        LocalRepository::with_targets(vec![
            target(1, 315.01417, 35.299, Some(7613823349)),
            target(2, 315.015, 35.2995, None),
            target(3, 10.0, -5.0, Some(99)),
        ])
    }

    #[tokio::test]
    async fn test_cone_search_degrees() {
        let cone = ConeSearch {
            ra: SkyCoordinate::Degrees(315.01417),
            dec: SkyCoordinate::Degrees(35.299),
            radius: 0.01,
            units: SearchUnits::Degree,
        };
        let found = repo().cone_search(&cone).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|t| t.sdss_id.value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_cone_search_small_radius_in_arcsec() {
        let cone = ConeSearch {
            ra: SkyCoordinate::Degrees(315.01417),
            dec: SkyCoordinate::Degrees(35.299),
            radius: 1.0,
            units: SearchUnits::Arcsec,
        };
        let found = repo().cone_search(&cone).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].sdss_id, SdssId::new(1));
    }

    #[tokio::test]
    async fn test_cone_search_invalid_center() {
        let cone = ConeSearch {
            ra: SkyCoordinate::Sexagesimal("nowhere".to_string()),
            dec: SkyCoordinate::Degrees(0.0),
            radius: 1.0,
            units: SearchUnits::Degree,
        };
        let err = repo().cone_search(&cone).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(err.context().operation.as_deref(), Some("cone_search"));
    }

    #[tokio::test]
    async fn test_lookup_by_ids() {
        let repo = repo();
        assert_eq!(repo.get_targets_by_sdss_id(SdssId::new(3)).await.unwrap().len(), 1);
        assert!(repo.get_targets_by_sdss_id(SdssId::new(42)).await.unwrap().is_empty());

        let by_cat = repo
            .get_targets_by_catalog_id(CatalogId::new(7613823349))
            .await
            .unwrap();
        assert_eq!(by_cat.len(), 1);
        assert_eq!(by_cat[0].sdss_id, SdssId::new(1));
    }

    #[tokio::test]
    async fn test_health_toggle() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("targets.json");
        std::fs::write(
            &path,
            r#"[{"sdss_id": 47510284, "ra_sdss_id": 315.01417, "dec_sdss_id": 35.299, "catalogid31": 7613823349}]"#,
        )
        .unwrap();

        let repo = LocalRepository::from_json_file(&path).unwrap();
        assert_eq!(repo.len(), 1);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            LocalRepository::from_json_file(&path),
            Err(RepositoryError::ConfigurationError { .. })
        ));
    }
}
