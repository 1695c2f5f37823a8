//! Template-table path registry.
//!
//! Resolves paths from an in-process table of templates, typically loaded
//! from the `[access]` section of the service configuration. Used for local
//! development and tests; production deployments point it at the same
//! template table the data archive publishes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::{AccessError, AccessResult};
use super::registry::{Keywords, PathRegistry};
use super::template::PathTemplate;
use crate::config::AccessSettings;

/// Environment variable that names the data root inside templates.
pub const SAS_BASE_DIR: &str = "SAS_BASE_DIR";

/// Path registry backed by a template table.
///
/// # Example
/// ```
/// use valis_rust::access::LocalPathRegistry;
///
/// let registry = LocalPathRegistry::new("sdsswork")
///     .with_sas_base_dir("/data/sas")
///     .with_template("plateholes", "$SAS_BASE_DIR/plates/{plate}/plateHoles-{plate:0>6}.par");
/// ```
#[derive(Debug, Clone)]
pub struct LocalPathRegistry {
    release: String,
    sas_base_dir: PathBuf,
    url_base: String,
    environment: BTreeMap<String, String>,
    templates: BTreeMap<String, PathTemplate>,
}

impl Default for LocalPathRegistry {
    fn default() -> Self {
        Self::new("sdsswork")
    }
}

impl LocalPathRegistry {
    pub fn new(release: impl Into<String>) -> Self {
        Self {
            release: release.into(),
            sas_base_dir: PathBuf::from("/"),
            url_base: "https://data.sdss5.org/sas".to_string(),
            environment: BTreeMap::new(),
            templates: BTreeMap::new(),
        }
    }

    /// Build a registry from the `[access]` configuration section.
    pub fn from_settings(settings: &AccessSettings) -> AccessResult<Self> {
        let mut registry = Self::new(settings.release.clone())
            .with_sas_base_dir(&settings.sas_base_dir)
            .with_url_base(settings.url_base.clone());

        for (var, value) in &settings.environment {
            registry = registry.with_environment(var.clone(), value.clone());
        }
        for (name, template) in &settings.templates {
            if name.trim().is_empty() {
                return Err(AccessError::Configuration(
                    "template names must not be empty".to_string(),
                ));
            }
            registry = registry.with_template(name.clone(), template.clone());
        }
        Ok(registry)
    }

    pub fn with_sas_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.sas_base_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_url_base(mut self, url_base: impl Into<String>) -> Self {
        self.url_base = url_base.into();
        self
    }

    pub fn with_environment(mut self, var: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(var.into(), value.into());
        self
    }

    pub fn with_template(mut self, name: impl Into<String>, template: impl AsRef<str>) -> Self {
        self.templates
            .insert(name.into(), PathTemplate::parse(template.as_ref()));
        self
    }

    fn template(&self, name: &str) -> AccessResult<&PathTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| AccessError::UnknownName(name.to_string()))
    }

    fn env_var(&self, var: &str) -> Option<String> {
        if let Some(value) = self.environment.get(var) {
            return Some(value.clone());
        }
        if var == SAS_BASE_DIR {
            return Some(self.sas_base_dir.to_string_lossy().into_owned());
        }
        std::env::var(var).ok()
    }

    fn resolve_full(&self, name: &str, kwargs: &Keywords) -> AccessResult<String> {
        self.template(name)?
            .render(kwargs, |var| self.env_var(var))
            .map_err(|key| AccessError::missing_keyword(name, key))
    }

    fn relative_location(&self, full: &str) -> String {
        match Path::new(full).strip_prefix(&self.sas_base_dir) {
            Ok(rel) => rel.to_string_lossy().into_owned(),
            Err(_) => full.trim_start_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PathRegistry for LocalPathRegistry {
    fn release(&self) -> &str {
        &self.release
    }

    async fn lookup_names(&self) -> AccessResult<Vec<String>> {
        Ok(self.templates.keys().cloned().collect())
    }

    async fn lookup_keys(&self, name: &str) -> AccessResult<Vec<String>> {
        Ok(self.template(name)?.keys())
    }

    async fn templates(&self) -> AccessResult<BTreeMap<String, String>> {
        Ok(self
            .templates
            .iter()
            .map(|(name, t)| (name.clone(), t.as_str().to_string()))
            .collect())
    }

    async fn full(&self, name: &str, kwargs: &Keywords) -> AccessResult<String> {
        self.resolve_full(name, kwargs)
    }

    async fn url(&self, name: &str, kwargs: &Keywords) -> AccessResult<String> {
        let location = self.relative_location(&self.resolve_full(name, kwargs)?);
        Ok(format!("{}/{}", self.url_base.trim_end_matches('/'), location))
    }

    async fn name(&self, name: &str, kwargs: &Keywords) -> AccessResult<String> {
        let full = self.resolve_full(name, kwargs)?;
        Ok(Path::new(&full)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    async fn location(&self, name: &str, kwargs: &Keywords) -> AccessResult<String> {
        Ok(self.relative_location(&self.resolve_full(name, kwargs)?))
    }

    async fn exists(&self, name: &str, kwargs: &Keywords) -> AccessResult<bool> {
        let full = self.resolve_full(name, kwargs)?;
        tokio::fs::try_exists(&full)
            .await
            .map_err(|source| AccessError::Io { path: full, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LocalPathRegistry {
        LocalPathRegistry::new("sdsswork")
            .with_sas_base_dir("/data/sas")
            .with_url_base("https://data.sdss5.org/sas/")
            .with_environment("MANGA_SPECTRO_REDUX", "/data/sas/mangawork/manga/spectro/redux")
            .with_template(
                "mangacube",
                "$MANGA_SPECTRO_REDUX/{drpver}/{plate}/stack/manga-{plate}-{ifu}-{wave}CUBE.fits.gz",
            )
            .with_template("summary", "$SAS_BASE_DIR/sdsswork/summary.fits")
    }

    fn cube_kwargs() -> Keywords {
        [("drpver", "v2_4_3"), ("wave", "LOG"), ("plate", "8485"), ("ifu", "1901")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_lookup_names_and_keys() {
        let reg = registry();
        assert_eq!(reg.lookup_names().await.unwrap(), vec!["mangacube", "summary"]);
        assert_eq!(
            reg.lookup_keys("mangacube").await.unwrap(),
            vec!["drpver", "plate", "ifu", "wave"]
        );
        assert!(reg.lookup_keys("summary").await.unwrap().is_empty());
        assert!(matches!(
            reg.lookup_keys("nope").await,
            Err(AccessError::UnknownName(_))
        ));
    }

    #[tokio::test]
    async fn test_resolved_parts() {
        let reg = registry();
        let kwargs = cube_kwargs();
        assert_eq!(
            reg.full("mangacube", &kwargs).await.unwrap(),
            "/data/sas/mangawork/manga/spectro/redux/v2_4_3/8485/stack/manga-8485-1901-LOGCUBE.fits.gz"
        );
        assert_eq!(
            reg.location("mangacube", &kwargs).await.unwrap(),
            "mangawork/manga/spectro/redux/v2_4_3/8485/stack/manga-8485-1901-LOGCUBE.fits.gz"
        );
        assert_eq!(
            reg.url("mangacube", &kwargs).await.unwrap(),
            "https://data.sdss5.org/sas/mangawork/manga/spectro/redux/v2_4_3/8485/stack/manga-8485-1901-LOGCUBE.fits.gz"
        );
        assert_eq!(
            reg.name("mangacube", &kwargs).await.unwrap(),
            "manga-8485-1901-LOGCUBE.fits.gz"
        );
    }

    #[tokio::test]
    async fn test_sas_base_dir_expansion() {
        let reg = registry();
        assert_eq!(
            reg.full("summary", &Keywords::new()).await.unwrap(),
            "/data/sas/sdsswork/summary.fits"
        );
    }

    #[tokio::test]
    async fn test_missing_keyword_error() {
        let reg = registry();
        let err = reg.full("mangacube", &Keywords::new()).await.unwrap_err();
        assert!(matches!(err, AccessError::MissingKeyword { ref key, .. } if key == "drpver"));
    }

    #[tokio::test]
    async fn test_exists_checks_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present.txt"), b"x").unwrap();

        let reg = LocalPathRegistry::new("dr17")
            .with_sas_base_dir(dir.path())
            .with_template("file", "$SAS_BASE_DIR/{stem}.txt");

        let mut kwargs = Keywords::new();
        kwargs.insert("stem".to_string(), "present".to_string());
        assert!(reg.exists("file", &kwargs).await.unwrap());

        kwargs.insert("stem".to_string(), "absent".to_string());
        assert!(!reg.exists("file", &kwargs).await.unwrap());
    }

    #[test]
    fn test_from_settings() {
        let mut settings = AccessSettings::default();
        settings.release = "dr17".to_string();
        settings
            .templates
            .insert("spec".to_string(), "$SAS_BASE_DIR/spectro/{plate}.fits".to_string());
        let reg = LocalPathRegistry::from_settings(&settings).unwrap();
        assert_eq!(reg.release(), "dr17");
        assert!(reg.templates.contains_key("spec"));

        settings.templates.insert(" ".to_string(), "x".to_string());
        assert!(LocalPathRegistry::from_settings(&settings).is_err());
    }
}
