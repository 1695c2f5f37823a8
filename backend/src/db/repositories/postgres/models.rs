use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable};
use qtty::Degrees;

use crate::models::{CatalogId, SdssId, Target};

/// Row of `vizdb.sdss_id_stacked` as returned by raw SQL queries.
#[derive(Debug, Clone, QueryableByName)]
pub struct TargetRow {
    #[diesel(sql_type = BigInt)]
    pub sdss_id: i64,
    #[diesel(sql_type = Double)]
    pub ra_sdss_id: f64,
    #[diesel(sql_type = Double)]
    pub dec_sdss_id: f64,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub catalogid21: Option<i64>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub catalogid25: Option<i64>,
    #[diesel(sql_type = Nullable<BigInt>)]
    pub catalogid31: Option<i64>,
}

impl From<TargetRow> for Target {
    fn from(row: TargetRow) -> Self {
        Target {
            sdss_id: SdssId::new(row.sdss_id),
            ra_sdss_id: Degrees::new(row.ra_sdss_id),
            dec_sdss_id: Degrees::new(row.dec_sdss_id),
            catalogid21: row.catalogid21.map(CatalogId::new),
            catalogid25: row.catalogid25.map(CatalogId::new),
            catalogid31: row.catalogid31.map(CatalogId::new),
        }
    }
}
