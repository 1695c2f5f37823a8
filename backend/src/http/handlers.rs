//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use super::dto::{
    CatalogIdQuery, ConeQuery, HealthResponse, PathBody, PathKeywords, PathsQuery, SdssIdQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::Target;
use crate::routes::paths::{self as path_routes, PathParams};
use crate::routes::query as query_routes;
use crate::services::paths::{self, FieldError, PathListing, PathOutput, PathRequest};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the catalog is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Paths
// =============================================================================

/// GET /paths
///
/// List all path names, or the name to template table with `templates=true`.
pub async fn get_paths(
    State(state): State<AppState>,
    query: Result<Query<PathsQuery>, QueryRejection>,
) -> HandlerResult<PathListing> {
    let Query(query) = query?;
    tracing::debug!(handler = path_routes::GET_PATHS, templates = query.templates);
    let listing = paths::list_paths(state.registry.as_ref(), query.templates).await?;
    Ok(Json(listing))
}

/// GET /paths/keywords/{name}
///
/// List the keywords needed to construct the path.
pub async fn get_path_kwargs(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult<PathKeywords> {
    tracing::debug!(handler = path_routes::GET_PATH_KWARGS, path = %name);
    let kwargs = paths::keywords_for(state.registry.as_ref(), &name).await?;
    Ok(Json(PathKeywords { name, kwargs }))
}

/// GET /paths/{name}?<kwargs>&part=&exists=
///
/// Resolve a path from query-string keywords. Without keywords the
/// template is returned with a warning.
pub async fn get_path_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    query: Result<Query<BTreeMap<String, String>>, QueryRejection>,
) -> HandlerResult<PathOutput> {
    let Query(query) = query?;
    let params = PathParams::from_query(query).map_err(AppError::Unprocessable)?;
    tracing::debug!(
        handler = path_routes::GET_PATH_NAME,
        path = %name,
        kwargs = ?params.kwargs,
        "resolving path"
    );

    let request = PathRequest::build(state.registry.as_ref(), &name, params.kwargs).await?;
    Ok(Json(paths::process_path(request, params.part, params.exists)))
}

/// POST /paths/{name}
///
/// Resolve a path from a JSON body `{kwargs, part, exists}`. The body is
/// optional; an empty one behaves like `{}`.
pub async fn post_path_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> HandlerResult<PathOutput> {
    let body: PathBody = if body.iter().all(u8::is_ascii_whitespace) {
        PathBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            AppError::Unprocessable(vec![FieldError::new("body", e.to_string())])
        })?
    };
    let kwargs = body
        .keywords()
        .map_err(|e| AppError::Unprocessable(vec![e]))?;
    tracing::debug!(
        handler = path_routes::POST_PATH_NAME,
        path = %name,
        kwargs = ?kwargs,
        "resolving path"
    );

    let request = PathRequest::build(state.registry.as_ref(), &name, kwargs).await?;
    Ok(Json(paths::process_path(request, body.part, body.exists)))
}

// =============================================================================
// Catalog Queries
// =============================================================================

/// GET /query/main
///
/// Placeholder for the search UI's main query.
pub async fn main_search() -> Json<serde_json::Value> {
    tracing::debug!(handler = query_routes::MAIN_SEARCH);
    Json(serde_json::Value::Null)
}

/// GET /query/cone?ra=&dec=&radius=&units=
pub async fn cone_search(
    State(state): State<AppState>,
    query: Result<Query<ConeQuery>, QueryRejection>,
) -> HandlerResult<Vec<Target>> {
    let Query(query) = query?;
    tracing::debug!(handler = query_routes::CONE_SEARCH, ra = %query.ra, dec = %query.dec);
    let (ra, dec) = query.center();
    let targets = db_services::cone_search(
        state.repository.as_ref(),
        ra,
        dec,
        query.radius,
        query.units,
    )
    .await?;
    Ok(Json(targets))
}

/// GET /query/sdssid?sdss_id=
pub async fn sdss_id_search(
    State(state): State<AppState>,
    query: Result<Query<SdssIdQuery>, QueryRejection>,
) -> HandlerResult<Vec<Target>> {
    let Query(query) = query?;
    tracing::debug!(handler = query_routes::SDSS_ID_SEARCH, sdss_id = %query.sdss_id);
    let targets =
        db_services::get_targets_by_sdss_id(state.repository.as_ref(), &query.sdss_id).await?;
    Ok(Json(targets))
}

/// GET /query/catalogid?catalog_id=
pub async fn catalog_id_search(
    State(state): State<AppState>,
    query: Result<Query<CatalogIdQuery>, QueryRejection>,
) -> HandlerResult<Vec<Target>> {
    let Query(query) = query?;
    tracing::debug!(handler = query_routes::CATALOG_ID_SEARCH, catalog_id = %query.catalog_id);
    let targets =
        db_services::get_targets_by_catalog_id(state.repository.as_ref(), &query.catalog_id)
            .await?;
    Ok(Json(targets))
}
