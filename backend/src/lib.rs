//! # valis-rust
//!
//! HTTP service for resolving SDSS data-product paths and querying the
//! SDSS-V target catalog.
//!
//! ## Features
//!
//! - **Path resolution**: validate a path name and its keywords against a
//!   template registry, then build the full path, URL, file name, location
//!   and existence flag
//! - **Catalog queries**: cone searches and `sdss_id` / `catalog_id` lookups
//! - **HTTP API**: axum endpoints under `/paths` and `/query`
//!
//! ## Architecture
//!
//! - [`access`]: path registry trait and the template-table implementation
//! - [`config`]: TOML configuration with environment overrides
//! - [`db`]: catalog repository pattern (in-memory and Postgres backends)
//! - [`models`]: identifiers, coordinates and target records
//! - [`routes`]: request and response types per route group
//! - [`services`]: path validation and output shaping
//! - [`http`]: axum router, handlers and error mapping
//! - [`api`]: flat re-export of the public types

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod access;
pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
