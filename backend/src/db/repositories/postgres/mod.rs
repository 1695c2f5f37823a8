//! Postgres repository implementation using Diesel.
//!
//! Reads the stacked sdss_id table (`vizdb.sdss_id_stacked`) of the SDSS-V
//! catalog database. Cone searches are delegated to the database's Q3C
//! extension (`q3c_radial_query`), so the table is expected to carry a Q3C
//! index on `(ra_sdss_id, dec_sdss_id)`.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Blocking Diesel work moved off the async runtime with `spawn_blocking`
//!
//! ## Configuration
//!
//! See [`PostgresConfig`]; the service fills it from the `[postgres]` table
//! of its config file.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{BigInt, Double};
use std::time::Duration;
use tokio::task;

use crate::db::config::PostgresConfig;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, TargetRepository};
use crate::models::{CatalogId, ConeSearch, SdssId, Target};

mod models;

use models::TargetRow;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const SELECT_TARGETS: &str = "SELECT sdss_id, ra_sdss_id, dec_sdss_id, \
     catalogid21, catalogid25, catalogid31 FROM vizdb.sdss_id_stacked";

/// Diesel-backed catalog repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and its connection pool.
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if the pool cannot be established
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        Ok(Self { pool })
    }

    /// Run a blocking Diesel operation on a pooled connection.
    ///
    /// Failures are returned as-is; the query endpoints do not retry.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::from(e).with_operation(operation)
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
        .map_err(|e| e.with_operation(operation))
    }
}

fn into_targets(rows: Vec<TargetRow>) -> Vec<Target> {
    rows.into_iter().map(Target::from).collect()
}

#[async_trait]
impl TargetRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn cone_search(&self, cone: &ConeSearch) -> RepositoryResult<Vec<Target>> {
        let (ra, dec) = cone
            .center()
            .map_err(|e| RepositoryError::from(e).with_operation("cone_search"))?;
        let radius = cone.radius_degrees();
        log::debug!(
            "Postgres cone search: ra={} dec={} radius={}deg",
            ra.value(),
            dec.value(),
            radius.value()
        );

        let query = format!(
            "{} WHERE q3c_radial_query(ra_sdss_id, dec_sdss_id, $1, $2, $3)",
            SELECT_TARGETS
        );
        self.with_conn("cone_search", move |conn| {
            sql_query(query)
                .bind::<Double, _>(ra.value())
                .bind::<Double, _>(dec.value())
                .bind::<Double, _>(radius.value())
                .load::<TargetRow>(conn)
                .map(into_targets)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn get_targets_by_sdss_id(&self, sdss_id: SdssId) -> RepositoryResult<Vec<Target>> {
        let query = format!("{} WHERE sdss_id = $1", SELECT_TARGETS);
        self.with_conn("get_targets_by_sdss_id", move |conn| {
            sql_query(query)
                .bind::<BigInt, _>(sdss_id.value())
                .load::<TargetRow>(conn)
                .map(into_targets)
                .map_err(RepositoryError::from)
        })
        .await
    }

    async fn get_targets_by_catalog_id(
        &self,
        catalog_id: CatalogId,
    ) -> RepositoryResult<Vec<Target>> {
        let query = format!(
            "{} WHERE catalogid21 = $1 OR catalogid25 = $1 OR catalogid31 = $1",
            SELECT_TARGETS
        );
        self.with_conn("get_targets_by_catalog_id", move |conn| {
            sql_query(query)
                .bind::<BigInt, _>(catalog_id.value())
                .load::<TargetRow>(conn)
                .map(into_targets)
                .map_err(RepositoryError::from)
        })
        .await
    }
}
