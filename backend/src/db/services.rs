//! Catalog query service layer.
//!
//! Thin pass-through functions that coerce caller input into typed query
//! parameters and delegate to a [`TargetRepository`]. Results are returned
//! exactly as the repository produced them: one repository call per request,
//! no retries and no caching.

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, TargetRepository};
use crate::models::{CatalogId, ConeSearch, IdParam, SdssId, SearchUnits, SkyCoordinate, Target};

/// Check if the repository backend is reachable.
pub async fn health_check(repo: &dyn TargetRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Targets within `radius` (in `units`) of `(ra, dec)`.
///
/// Range checks and sexagesimal conversion are left to the repository.
pub async fn cone_search(
    repo: &dyn TargetRepository,
    ra: SkyCoordinate,
    dec: SkyCoordinate,
    radius: f64,
    units: SearchUnits,
) -> RepositoryResult<Vec<Target>> {
    let cone = ConeSearch {
        ra,
        dec,
        radius,
        units,
    };
    log::debug!(
        "cone_search ra={:?} dec={:?} radius={} {}",
        cone.ra,
        cone.dec,
        cone.radius,
        cone.units
    );
    repo.cone_search(&cone).await
}

/// Targets with the given `sdss_id`, coerced from an integer or integer-like text.
pub async fn get_targets_by_sdss_id(
    repo: &dyn TargetRepository,
    sdss_id: &IdParam,
) -> RepositoryResult<Vec<Target>> {
    let id: SdssId = coerce_id(sdss_id, "get_targets_by_sdss_id", "sdss_id")?;
    log::debug!("get_targets_by_sdss_id sdss_id={}", id);
    repo.get_targets_by_sdss_id(id).await
}

/// Targets matching `catalog_id` in any cross-match version.
pub async fn get_targets_by_catalog_id(
    repo: &dyn TargetRepository,
    catalog_id: &IdParam,
) -> RepositoryResult<Vec<Target>> {
    let id: CatalogId = coerce_id(catalog_id, "get_targets_by_catalog_id", "catalog_id")?;
    log::debug!("get_targets_by_catalog_id catalog_id={}", id);
    repo.get_targets_by_catalog_id(id).await
}

fn coerce_id<T>(param: &IdParam, operation: &str, field: &str) -> RepositoryResult<T>
where
    T: From<i64> + std::str::FromStr<Err = std::num::ParseIntError>,
{
    param.parse::<T>().map_err(|e| {
        RepositoryError::validation_with_context(
            format!("{} must be an integer: {}", field, e),
            ErrorContext::new(operation)
                .with_entity(field)
                .with_entity_id(param),
        )
    })
}
