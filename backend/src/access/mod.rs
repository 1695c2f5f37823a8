//! Path registry layer.
//!
//! Mirrors the repository layer in [`crate::db`]: a trait describing the
//! collaborator ([`PathRegistry`]) and an implementation backed by a
//! configured template table ([`LocalPathRegistry`]).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  services::paths - validation and output shaping        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  PathRegistry trait (registry.rs)                       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  LocalPathRegistry (local.rs) + PathTemplate            │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod local;
pub mod registry;
pub mod template;

pub use error::{AccessError, AccessResult};
pub use local::LocalPathRegistry;
pub use registry::{release_label, Keywords, PathRegistry};
pub use template::PathTemplate;
