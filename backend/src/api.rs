//! Public API surface.
//!
//! Consolidates the types a client of the library or the HTTP API deals
//! with. All of them derive Serialize/Deserialize.

pub use crate::access::Keywords;
pub use crate::models::{CatalogId, IdParam, SdssId, SearchUnits, SkyCoordinate, Target};
pub use crate::routes::paths::{PathBody, PathKeywords, PathsQuery};
pub use crate::routes::query::{CatalogIdQuery, ConeQuery, SdssIdQuery};
pub use crate::services::paths::{FieldError, PathListing, PathOutput, PathPart, PathRequest};
