//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{RepositoryError, RepositoryResult, TargetRepository};
use super::PostgresConfig;
use crate::config::ServiceConfig;

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Postgres + Diesel implementation
    Postgres,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("postgres", "pg", "local")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```
/// use valis_rust::db::{RepositoryFactory, RepositoryType};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = RepositoryFactory::create(RepositoryType::Local, None).await.unwrap();
///     assert!(repo.health_check().await.unwrap());
/// });
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance based on type.
    ///
    /// # Arguments
    /// * `repo_type` - Type of repository to create
    /// * `postgres_config` - Optional database configuration (required for Postgres)
    pub async fn create(
        repo_type: RepositoryType,
        postgres_config: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn TargetRepository>> {
        match repo_type {
            RepositoryType::Postgres => {
                #[cfg(feature = "postgres-repo")]
                {
                    let config = postgres_config.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Postgres repository requires PostgresConfig",
                        )
                    })?;
                    let pg = Self::create_postgres(config).await?;
                    Ok(pg as Arc<dyn TargetRepository>)
                }
                #[cfg(not(feature = "postgres-repo"))]
                {
                    let _ = postgres_config;
                    Err(RepositoryError::configuration(
                        "Postgres repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create a Postgres repository.
    #[cfg(feature = "postgres-repo")]
    pub async fn create_postgres(
        config: &PostgresConfig,
    ) -> RepositoryResult<Arc<PostgresRepository>> {
        let repo = PostgresRepository::new(config.clone())?;
        log::info!(
            "Postgres repository ready (pool max_size={})",
            config.max_pool_size
        );
        Ok(Arc::new(repo))
    }

    /// Create an empty in-memory local repository.
    pub fn create_local() -> Arc<dyn TargetRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create the repository described by a loaded [`ServiceConfig`].
    ///
    /// A local repository is seeded from `local.targets_file` when set.
    pub async fn from_config(config: &ServiceConfig) -> RepositoryResult<Arc<dyn TargetRepository>> {
        match config.repository_type()? {
            RepositoryType::Local => match &config.local.targets_file {
                Some(path) => Ok(Arc::new(LocalRepository::from_json_file(path)?)),
                None => Ok(Self::create_local()),
            },
            RepositoryType::Postgres => {
                let pg_config = config.to_postgres_config()?;
                Self::create(RepositoryType::Postgres, pg_config.as_ref()).await
            }
        }
    }
}
