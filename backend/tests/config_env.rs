mod support;

use std::path::PathBuf;

use support::with_scoped_env;
use valis_rust::config::{ServiceConfig, CONFIG_ENV_VAR};
use valis_rust::db::{RepositoryError, RepositoryType};

const OVERRIDES: [&str; 7] = [
    CONFIG_ENV_VAR,
    "HOST",
    "PORT",
    "REPOSITORY_TYPE",
    "DATABASE_URL",
    "PG_DATABASE_URL",
    "SAS_BASE_DIR",
];

fn cleared<'a>(extra: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<(&str, Option<&str>)> = OVERRIDES.iter().map(|k| (*k, None)).collect();
    changes.extend_from_slice(extra);
    changes
}

#[test]
fn test_explicit_config_file_with_env_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("valis.toml");
    std::fs::write(
        &path,
        r#"
[server]
port = 9000

[access]
release = "dr17"
sas_base_dir = "/data/sas"

[access.templates]
spec = "$SAS_BASE_DIR/spectro/{plate}.fits"
"#,
    )
    .unwrap();
    let path_str = path.to_string_lossy().into_owned();

    let config = with_scoped_env(
        &cleared(&[
            (CONFIG_ENV_VAR, Some(path_str.as_str())),
            ("HOST", Some("127.0.0.1")),
            ("SAS_BASE_DIR", Some("/mnt/sas")),
        ]),
        ServiceConfig::load,
    )
    .unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.access.release, "dr17");
    assert_eq!(config.access.sas_base_dir, PathBuf::from("/mnt/sas"));
    assert_eq!(config.access.templates.len(), 1);
}

#[test]
fn test_missing_explicit_config_file_is_an_error() {
    let result = with_scoped_env(
        &cleared(&[(CONFIG_ENV_VAR, Some("/nonexistent/valis.toml"))]),
        ServiceConfig::load,
    );
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[test]
fn test_invalid_port_override() {
    let mut config = ServiceConfig::default();
    let result = with_scoped_env(&cleared(&[("PORT", Some("eighty"))]), || {
        config.apply_env_overrides()
    });
    assert!(result.is_err());
}

#[test]
fn test_database_url_override_selects_postgres_settings() {
    let mut config = ServiceConfig::default();
    with_scoped_env(
        &cleared(&[
            ("REPOSITORY_TYPE", Some("pg")),
            ("PG_DATABASE_URL", Some("postgres://localhost/sdss5db")),
        ]),
        || config.apply_env_overrides(),
    )
    .unwrap();

    assert_eq!(config.repository_type().unwrap(), RepositoryType::Postgres);
    let pg = config.to_postgres_config().unwrap().unwrap();
    assert_eq!(pg.database_url, "postgres://localhost/sdss5db");
    assert_eq!(pg.max_pool_size, 10);
}
