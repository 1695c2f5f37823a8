//! Request and response types of the two route groups.
//!
//! - [`paths`]: `/paths`, path name listing and resolution
//! - [`query`]: `/query`, catalog searches

pub mod paths;
pub mod query;
