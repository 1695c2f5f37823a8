//! Path name validation and resolution.
//!
//! A request is validated in stages against a [`PathRegistry`]: the name
//! must be known, then the supplied keywords must either cover every
//! required key or share none with them. Resolution into the derived forms
//! only happens when there is something to resolve with.
//!
//! ```text
//! validate_name ─► validate_keywords ─► compute_needs_keywords ─► template
//!                                                                   │
//!                                   kwargs non-empty || !needs ─► resolve
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::access::{release_label, AccessError, Keywords, PathRegistry};

/// Returned in place of a resolved path when keywords are required but none were given.
pub const NO_KWARGS_WARNING: &str =
    "Warning: No kwargs specified to construct a path.  Returning only template.";

/// One invalid input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Caller input was rejected.
    #[error("{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// The registry itself failed.
    #[error(transparent)]
    Registry(#[from] AccessError),
}

impl PathError {
    fn invalid(field: &str, message: String) -> Self {
        PathError::Validation(vec![FieldError::new(field, message)])
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type PathResult<T> = Result<T, PathError>;

/// Which derived form of a path to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPart {
    #[default]
    Full,
    Url,
    File,
    Location,
    All,
}

impl PathPart {
    pub fn as_str(self) -> &'static str {
        match self {
            PathPart::Full => "full",
            PathPart::Url => "url",
            PathPart::File => "file",
            PathPart::Location => "location",
            PathPart::All => "all",
        }
    }
}

impl FromStr for PathPart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(PathPart::Full),
            "url" => Ok(PathPart::Url),
            "file" => Ok(PathPart::File),
            "location" => Ok(PathPart::Location),
            "all" => Ok(PathPart::All),
            other => Err(format!(
                "value '{}' is not one of 'full', 'url', 'file', 'location', 'all'",
                other
            )),
        }
    }
}

/// Fail unless `name` is known to the registry.
pub async fn validate_name(registry: &dyn PathRegistry, name: &str) -> PathResult<()> {
    let names = registry.lookup_names().await?;
    if names.iter().any(|n| n == name) {
        return Ok(());
    }
    Err(PathError::invalid(
        "name",
        format!(
            "Validation error: path name {} not a valid sdss_access name for release {}",
            name,
            release_label(registry.release())
        ),
    ))
}

/// Check supplied keywords against the keys `name` requires.
///
/// Keywords sharing no key with the required set count as no keywords and
/// yield an empty mapping. A partial set is an error naming the missing
/// keys. A complete set is returned as given, unrecognized keys included.
pub async fn validate_keywords(
    registry: &dyn PathRegistry,
    name: &str,
    kwargs: Keywords,
) -> PathResult<Keywords> {
    let required: BTreeSet<String> = registry.lookup_keys(name).await?.into_iter().collect();

    if !kwargs.keys().any(|k| required.contains(k)) {
        return Ok(Keywords::new());
    }

    let missing: Vec<&str> = required
        .iter()
        .filter(|k| !kwargs.contains_key(*k))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(PathError::invalid(
            "kwargs",
            format!(
                "Validation error: Missing kwargs {} for name: {}",
                missing.join(", "),
                name
            ),
        ));
    }

    Ok(kwargs)
}

/// Whether `name` has any template keys at all.
pub async fn compute_needs_keywords(registry: &dyn PathRegistry, name: &str) -> PathResult<bool> {
    Ok(!registry.lookup_keys(name).await?.is_empty())
}

/// Every derived form of a resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub full: String,
    pub url: String,
    pub file: String,
    pub location: String,
    pub exists: bool,
}

/// Ask the registry for each derived form, one call per field.
pub async fn resolve(
    registry: &dyn PathRegistry,
    name: &str,
    kwargs: &Keywords,
) -> PathResult<ResolvedPath> {
    Ok(ResolvedPath {
        full: registry.full(name, kwargs).await?,
        url: registry.url(name, kwargs).await?,
        file: registry.name(name, kwargs).await?,
        location: registry.location(name, kwargs).await?,
        exists: registry.exists(name, kwargs).await?,
    })
}

/// A validated path request.
///
/// The derived fields are present iff the path was resolved, which happens
/// when keywords were supplied or the template takes none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRequest {
    name: String,
    kwargs: Keywords,
    template: String,
    full: Option<String>,
    url: Option<String>,
    file: Option<String>,
    location: Option<String>,
    exists: Option<bool>,
    needs_kwargs: bool,
}

impl PathRequest {
    /// Validate `name` and `kwargs`, then resolve if possible.
    ///
    /// Stops at the first validation failure; nothing is resolved for an
    /// invalid request.
    pub async fn build(
        registry: &dyn PathRegistry,
        name: &str,
        kwargs: Keywords,
    ) -> PathResult<Self> {
        validate_name(registry, name).await?;
        let kwargs = validate_keywords(registry, name, kwargs).await?;
        let needs_kwargs = compute_needs_keywords(registry, name).await?;

        let template = registry
            .templates()
            .await?
            .remove(name)
            .ok_or_else(|| AccessError::UnknownName(name.to_string()))?;

        let mut request = Self {
            name: name.to_string(),
            kwargs,
            template,
            full: None,
            url: None,
            file: None,
            location: None,
            exists: None,
            needs_kwargs,
        };

        if !request.kwargs.is_empty() || !needs_kwargs {
            let resolved = resolve(registry, name, &request.kwargs).await?;
            request.full = Some(resolved.full);
            request.url = Some(resolved.url);
            request.file = Some(resolved.file);
            request.location = Some(resolved.location);
            request.exists = Some(resolved.exists);
        }

        Ok(request)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kwargs(&self) -> &Keywords {
        &self.kwargs
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn needs_kwargs(&self) -> bool {
        self.needs_kwargs
    }

    pub fn is_resolved(&self) -> bool {
        self.full.is_some()
    }

    pub fn exists(&self) -> Option<bool> {
        self.exists
    }

    /// The string-valued derived form for `part`; `None` for `All` or when unresolved.
    pub fn part(&self, part: PathPart) -> Option<&str> {
        match part {
            PathPart::Full => self.full.as_deref(),
            PathPart::Url => self.url.as_deref(),
            PathPart::File => self.file.as_deref(),
            PathPart::Location => self.location.as_deref(),
            PathPart::All => None,
        }
    }
}

/// Response body for a path request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathOutput {
    /// Keywords were needed but not given.
    Template { template: String, warning: String },
    /// Existence check only.
    Exists { exists: Option<bool> },
    /// The whole validated request.
    All(PathRequest),
    /// A single derived form keyed by its part name.
    Part(BTreeMap<String, Option<String>>),
}

/// Shape a validated request for output.
///
/// Priority: missing keywords, then the `exists` flag, then `part`.
pub fn process_path(request: PathRequest, part: PathPart, exists: bool) -> PathOutput {
    if request.kwargs.is_empty() && request.needs_kwargs {
        log::warn!(
            "No kwargs specified for path name {}; returning template only",
            request.name
        );
        return PathOutput::Template {
            template: request.template,
            warning: NO_KWARGS_WARNING.to_string(),
        };
    }

    if exists {
        return PathOutput::Exists {
            exists: request.exists,
        };
    }

    match part {
        PathPart::All => PathOutput::All(request),
        single => {
            let mut out = BTreeMap::new();
            out.insert(
                single.as_str().to_string(),
                request.part(single).map(str::to_string),
            );
            PathOutput::Part(out)
        }
    }
}

/// Either the known names or the full name to template table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathListing {
    Names { names: Vec<String> },
    Templates(BTreeMap<String, String>),
}

pub async fn list_paths(registry: &dyn PathRegistry, templates: bool) -> PathResult<PathListing> {
    if templates {
        Ok(PathListing::Templates(registry.templates().await?))
    } else {
        Ok(PathListing::Names {
            names: registry.lookup_names().await?,
        })
    }
}

/// Keys required by a known path name.
pub async fn keywords_for(registry: &dyn PathRegistry, name: &str) -> PathResult<Vec<String>> {
    validate_name(registry, name).await?;
    Ok(registry.lookup_keys(name).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::LocalPathRegistry;
    use proptest::prelude::*;
    use serde_json::json;

    const CUBE: &str =
        "$MANGA_SPECTRO_REDUX/{drpver}/{plate}/stack/manga-{plate}-{ifu}-{wave}CUBE.fits.gz";

    fn registry(release: &str) -> LocalPathRegistry {
        LocalPathRegistry::new(release)
            .with_sas_base_dir("/data/sas")
            .with_environment("MANGA_SPECTRO_REDUX", "/data/sas/mangawork/manga/spectro/redux")
            .with_template("mangacube", CUBE)
            .with_template("summary", "$SAS_BASE_DIR/sdsswork/summary.fits")
    }

    fn kw(pairs: &[(&str, &str)]) -> Keywords {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn cube_kwargs() -> Keywords {
        kw(&[("drpver", "v2_4_3"), ("wave", "LOG"), ("plate", "8485"), ("ifu", "1901")])
    }

    fn field_errors(err: PathError) -> Vec<FieldError> {
        match err {
            PathError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_name_reports_work_release() {
        let reg = registry("sdss5");
        let errors = field_errors(validate_name(&reg, "nope").await.unwrap_err());
        assert_eq!(
            errors,
            vec![FieldError::new(
                "name",
                "Validation error: path name nope not a valid sdss_access name for release WORK"
            )]
        );
    }

    #[tokio::test]
    async fn test_unknown_name_reports_public_release() {
        let reg = registry("dr17");
        let err = PathRequest::build(&reg, "nope", cube_kwargs()).await.unwrap_err();
        assert!(err.to_string().ends_with("for release DR17"));
    }

    #[tokio::test]
    async fn test_partial_keywords_rejected() {
        let reg = registry("sdsswork");
        let errors = field_errors(
            validate_keywords(&reg, "mangacube", kw(&[("drpver", "v2_4_3"), ("plate", "8485")]))
                .await
                .unwrap_err(),
        );
        assert_eq!(errors[0].field, "kwargs");
        assert_eq!(
            errors[0].message,
            "Validation error: Missing kwargs ifu, wave for name: mangacube"
        );
    }

    #[tokio::test]
    async fn test_complete_keywords_keep_extra_keys() {
        let reg = registry("sdsswork");
        let mut kwargs = cube_kwargs();
        kwargs.insert("extra".to_string(), "1".to_string());
        let out = validate_keywords(&reg, "mangacube", kwargs.clone()).await.unwrap();
        assert_eq!(out, kwargs);
    }

    #[tokio::test]
    async fn test_needs_keywords() {
        let reg = registry("sdsswork");
        assert!(compute_needs_keywords(&reg, "mangacube").await.unwrap());
        assert!(!compute_needs_keywords(&reg, "summary").await.unwrap());
    }

    #[tokio::test]
    async fn test_build_without_kwargs_is_unresolved() {
        let reg = registry("sdsswork");
        let request = PathRequest::build(&reg, "mangacube", Keywords::new()).await.unwrap();
        assert!(!request.is_resolved());
        assert!(request.needs_kwargs());
        assert_eq!(request.template(), CUBE);
        assert_eq!(request.exists(), None);
    }

    #[tokio::test]
    async fn test_build_without_needed_kwargs_resolves() {
        let reg = registry("sdsswork");
        let request = PathRequest::build(&reg, "summary", Keywords::new()).await.unwrap();
        assert!(request.is_resolved());
        assert_eq!(request.part(PathPart::Location), Some("sdsswork/summary.fits"));
    }

    #[tokio::test]
    async fn test_process_path_template_branch() {
        let reg = registry("sdsswork");
        let request = PathRequest::build(&reg, "mangacube", Keywords::new()).await.unwrap();
        let out = serde_json::to_value(process_path(request, PathPart::All, true)).unwrap();
        assert_eq!(out, json!({"template": CUBE, "warning": NO_KWARGS_WARNING}));
    }

    #[tokio::test]
    async fn test_process_path_exists_beats_part() {
        let reg = registry("sdsswork");
        let request = PathRequest::build(&reg, "mangacube", cube_kwargs()).await.unwrap();
        let out = serde_json::to_value(process_path(request, PathPart::All, true)).unwrap();
        assert_eq!(out, json!({"exists": false}));
    }

    #[tokio::test]
    async fn test_process_path_single_part() {
        let reg = registry("sdsswork");
        let request = PathRequest::build(&reg, "mangacube", cube_kwargs()).await.unwrap();
        let out = serde_json::to_value(process_path(request, PathPart::Full, false)).unwrap();
        assert_eq!(
            out,
            json!({"full": "/data/sas/mangawork/manga/spectro/redux/v2_4_3/8485/stack/manga-8485-1901-LOGCUBE.fits.gz"})
        );
    }

    #[tokio::test]
    async fn test_process_path_all() {
        let reg = registry("sdsswork");
        let request = PathRequest::build(&reg, "mangacube", cube_kwargs()).await.unwrap();
        let out = serde_json::to_value(process_path(request, PathPart::All, false)).unwrap();
        assert_eq!(out["name"], "mangacube");
        assert_eq!(out["file"], "manga-8485-1901-LOGCUBE.fits.gz");
        assert_eq!(out["exists"], false);
        assert_eq!(out["needs_kwargs"], true);
        assert_eq!(out["kwargs"]["plate"], "8485");
        for key in ["template", "full", "url", "location"] {
            assert!(out[key].is_string(), "{key} should be set");
        }
    }

    #[tokio::test]
    async fn test_keywords_for_validates_name() {
        let reg = registry("sdsswork");
        assert_eq!(
            keywords_for(&reg, "mangacube").await.unwrap(),
            vec!["drpver", "plate", "ifu", "wave"]
        );
        assert!(matches!(
            keywords_for(&reg, "nope").await,
            Err(PathError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_paths() {
        let reg = registry("sdsswork");
        let names = serde_json::to_value(list_paths(&reg, false).await.unwrap()).unwrap();
        assert_eq!(names, json!({"names": ["mangacube", "summary"]}));

        let templates = serde_json::to_value(list_paths(&reg, true).await.unwrap()).unwrap();
        assert_eq!(templates["mangacube"], CUBE);
    }

    #[test]
    fn test_path_part_parse() {
        assert_eq!("location".parse::<PathPart>().unwrap(), PathPart::Location);
        assert!("everything".parse::<PathPart>().is_err());
        assert_eq!(PathPart::default(), PathPart::Full);
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    proptest! {
        #[test]
        fn disjoint_kwargs_behave_like_none(
            extra in proptest::collection::btree_map("[a-z_]{1,8}", "[A-Za-z0-9]{0,6}", 0..5)
        ) {
            let required = ["drpver", "plate", "ifu", "wave"];
            let kwargs: Keywords = extra
                .into_iter()
                .filter(|(k, _)| !required.contains(&k.as_str()))
                .collect();

            let reg = registry("sdsswork");
            let request = runtime()
                .block_on(PathRequest::build(&reg, "mangacube", kwargs))
                .unwrap();
            prop_assert!(request.kwargs().is_empty());
            prop_assert!(!request.is_resolved());
            let out = process_path(request, PathPart::Url, true);
            let is_template = matches!(out, PathOutput::Template { .. });
            prop_assert!(is_template);
        }

        #[test]
        fn partial_kwargs_list_exactly_the_missing_keys(mask in 1u8..15) {
            let all = cube_kwargs();
            let kwargs: Keywords = all
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, (k, v))| (k.clone(), v.clone()))
                .collect();
            let expected: Vec<&str> = all
                .keys()
                .filter(|k| !kwargs.contains_key(*k))
                .map(String::as_str)
                .collect();

            let reg = registry("sdsswork");
            let err = runtime()
                .block_on(validate_keywords(&reg, "mangacube", kwargs))
                .unwrap_err();
            let errors = field_errors(err);
            prop_assert_eq!(
                &errors[0].message,
                &format!(
                    "Validation error: Missing kwargs {} for name: mangacube",
                    expected.join(", ")
                )
            );
        }
    }
}
