#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

#[cfg(feature = "http-server")]
pub mod app {
    use std::path::Path;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use qtty::Degrees;
    use serde_json::Value;
    use tower::ServiceExt;

    use valis_rust::access::LocalPathRegistry;
    use valis_rust::db::repositories::LocalRepository;
    use valis_rust::http::{create_router, AppState};
    use valis_rust::models::{CatalogId, SdssId, Target};

    pub const CUBE_TEMPLATE: &str =
        "$MANGA_SPECTRO_REDUX/{drpver}/{plate}/stack/manga-{plate}-{ifu}-{wave}CUBE.fits.gz";

    pub const PLATE_TEMPLATE: &str = "${SAS_BASE_DIR}/sdsswork/plates/plate-{plate:0>6}.fits";

    /// Registry rooted at `sas_base_dir` with a MaNGA cube, a plate file using the
    /// braced `${VAR}` form, and a keyword-free summary file.
    pub fn registry(sas_base_dir: &Path) -> LocalPathRegistry {
        LocalPathRegistry::new("sdsswork")
            .with_sas_base_dir(sas_base_dir)
            .with_environment(
                "MANGA_SPECTRO_REDUX",
                sas_base_dir
                    .join("mangawork/manga/spectro/redux")
                    .to_string_lossy()
                    .into_owned(),
            )
            .with_template("mangacube", CUBE_TEMPLATE)
            .with_template("platefile", PLATE_TEMPLATE)
            .with_template("summary", "$SAS_BASE_DIR/sdsswork/summary.fits")
    }

    pub fn targets() -> Vec<Target> {
        vec![
            Target {
                sdss_id: SdssId::new(47510284),
                ra_sdss_id: Degrees::new(315.01417),
                dec_sdss_id: Degrees::new(35.299),
                catalogid21: Some(CatalogId::new(4375787890)),
                catalogid25: Some(CatalogId::new(7613823349)),
                catalogid31: Some(CatalogId::new(63050395075696130)),
            },
            Target {
                sdss_id: SdssId::new(47510285),
                ra_sdss_id: Degrees::new(315.02),
                dec_sdss_id: Degrees::new(35.30),
                catalogid21: None,
                catalogid25: None,
                catalogid31: Some(CatalogId::new(63050395075696131)),
            },
            Target {
                sdss_id: SdssId::new(1),
                ra_sdss_id: Degrees::new(10.0),
                dec_sdss_id: Degrees::new(-5.0),
                catalogid21: None,
                catalogid25: None,
                catalogid31: None,
            },
        ]
    }

    pub fn router(sas_base_dir: &Path) -> Router {
        let state = AppState::new(
            Arc::new(registry(sas_base_dir)),
            Arc::new(LocalRepository::with_targets(targets())),
        );
        create_router(state)
    }

    /// Send one request and return the status with the JSON body.
    pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        send(
            router,
            Request::builder().uri(uri).body(Body::empty()).unwrap(),
        )
        .await
    }

    pub async fn post_json(router: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        send(
            router,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
