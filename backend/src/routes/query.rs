use serde::{Deserialize, Serialize};

use crate::models::{IdParam, SearchUnits, SkyCoordinate};

/// Handler names, logged as the `handler` field of request events.
pub const MAIN_SEARCH: &str = "main_search";
pub const CONE_SEARCH: &str = "cone_search";
pub const SDSS_ID_SEARCH: &str = "sdss_id_search";
pub const CATALOG_ID_SEARCH: &str = "catalog_id_search";

/// `GET /query/cone` parameters.
///
/// `ra` and `dec` stay text until [`ConeQuery::center`]: numeric text is
/// degrees, anything else is treated as sexagesimal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConeQuery {
    pub ra: String,
    pub dec: String,
    pub radius: f64,
    #[serde(default)]
    pub units: SearchUnits,
}

impl ConeQuery {
    pub fn center(&self) -> (SkyCoordinate, SkyCoordinate) {
        (SkyCoordinate::parse(&self.ra), SkyCoordinate::parse(&self.dec))
    }
}

/// `GET /query/sdssid` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdssIdQuery {
    pub sdss_id: IdParam,
}

/// `GET /query/catalogid` parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogIdQuery {
    pub catalog_id: IdParam,
}
