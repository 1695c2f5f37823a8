//! Path registry trait.
//!
//! A registry maps path names to file-path templates and knows how to turn a
//! name plus keyword values into concrete locations. The HTTP layer only
//! depends on this trait; implementations are injected through `AppState`.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::AccessResult;

/// Keyword arguments used to fill a path template.
pub type Keywords = BTreeMap<String, String>;

/// Releases that share the working data area and are reported as `WORK`.
const WORK_RELEASES: [&str; 3] = ["sdss5", "sdss4", "sdsswork"];

/// Surface label for a release: the working releases collapse to `WORK`,
/// anything else is reported uppercased (e.g. `dr17` -> `DR17`). The match
/// is exact, so `SDSSWORK` stays `SDSSWORK`.
pub fn release_label(release: &str) -> String {
    if WORK_RELEASES.contains(&release) {
        "WORK".to_string()
    } else {
        release.to_uppercase()
    }
}

#[async_trait]
pub trait PathRegistry: Send + Sync {
    /// Active data release, e.g. `sdsswork` or `dr17`.
    fn release(&self) -> &str;

    /// All known path names.
    async fn lookup_names(&self) -> AccessResult<Vec<String>>;

    /// Keywords required to resolve `name`, in template order.
    async fn lookup_keys(&self, name: &str) -> AccessResult<Vec<String>>;

    /// Name to template mapping for every known path.
    async fn templates(&self) -> AccessResult<BTreeMap<String, String>>;

    /// Fully resolved local path.
    async fn full(&self, name: &str, kwargs: &Keywords) -> AccessResult<String>;

    /// Remote URL of the resolved path.
    async fn url(&self, name: &str, kwargs: &Keywords) -> AccessResult<String>;

    /// Bare file name of the resolved path.
    async fn name(&self, name: &str, kwargs: &Keywords) -> AccessResult<String>;

    /// Resolved path relative to the data root.
    async fn location(&self, name: &str, kwargs: &Keywords) -> AccessResult<String>;

    /// Whether the resolved file exists.
    async fn exists(&self, name: &str, kwargs: &Keywords) -> AccessResult<bool>;
}
