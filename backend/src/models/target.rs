//! Catalog target records returned by the query endpoints.

use qtty::Degrees;
use serde::{Deserialize, Serialize};

use crate::define_id_type;

define_id_type!(SdssId);
define_id_type!(CatalogId);

/// An identifier as supplied by the caller: a JSON integer or integer-like text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdParam {
    Int(i64),
    Text(String),
}

impl IdParam {
    /// Coerce to a typed identifier.
    pub fn parse<T>(&self) -> Result<T, std::num::ParseIntError>
    where
        T: From<i64> + std::str::FromStr<Err = std::num::ParseIntError>,
    {
        match self {
            IdParam::Int(v) => Ok(T::from(*v)),
            IdParam::Text(text) => text.parse::<T>(),
        }
    }
}

impl std::fmt::Display for IdParam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdParam::Int(v) => write!(f, "{}", v),
            IdParam::Text(text) => f.write_str(text),
        }
    }
}

/// One row of the stacked sdss_id table.
///
/// A single `sdss_id` groups the catalog ids a source received across the
/// v0.5 (`catalogid21`), v1 (`catalogid25`) and v1.1 (`catalogid31`)
/// cross-matches. Any of them may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub sdss_id: SdssId,
    pub ra_sdss_id: Degrees,
    pub dec_sdss_id: Degrees,
    #[serde(default)]
    pub catalogid21: Option<CatalogId>,
    #[serde(default)]
    pub catalogid25: Option<CatalogId>,
    #[serde(default)]
    pub catalogid31: Option<CatalogId>,
}

impl Target {
    /// Whether any of the cross-match catalog ids equals `id`.
    pub fn has_catalog_id(&self, id: CatalogId) -> bool {
        [self.catalogid21, self.catalogid25, self.catalogid31]
            .iter()
            .any(|c| *c == Some(id))
    }
}
