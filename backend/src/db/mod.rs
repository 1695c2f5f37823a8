//! Catalog database access.
//!
//! This module provides abstractions for catalog queries via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (routes under /query)                       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - input coercion            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!          ┌──────────┴──────────┐
//!          ▼                     ▼
//!   ┌─────────────┐      ┌───────────────┐
//!   │   Postgres  │      │     Local     │
//!   │ (q3c, r2d2) │      │  (in-memory)  │
//!   └─────────────┘      └───────────────┘
//! ```
//!
//! Repositories are created once at startup (see [`factory`]) and handed to
//! the HTTP layer through its state; there is no process-wide instance.
//!
//! # Usage
//! ```
//! use valis_rust::db::{services, RepositoryFactory};
//! use valis_rust::models::IdParam;
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let repo = RepositoryFactory::create_local();
//!     let targets = services::get_targets_by_sdss_id(repo.as_ref(), &IdParam::Int(1))
//!         .await
//!         .unwrap();
//!     assert!(targets.is_empty());
//! });
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod config;
pub mod factory;
pub mod repositories;
pub mod repository;
pub mod services;

pub use config::PostgresConfig;
pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, TargetRepository};
