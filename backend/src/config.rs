//! Service configuration file support.
//!
//! Configuration is read from a TOML file (`valis.toml` by default, or the
//! path named by `VALIS_CONFIG`) and then overridden by environment
//! variables. Every section is optional.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [repository]
//! type = "local"
//!
//! [local]
//! targets_file = "targets.json"
//!
//! [access]
//! release = "sdsswork"
//! sas_base_dir = "/data/sas"
//!
//! [access.environment]
//! MANGA_SPECTRO_REDUX = "/data/sas/mangawork/manga/spectro/redux"
//!
//! [access.templates]
//! mangacube = "$MANGA_SPECTRO_REDUX/{drpver}/{plate}/stack/manga-{plate}-{ifu}-{wave}CUBE.fits.gz"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::factory::RepositoryType;
use crate::db::repository::RepositoryError;
use crate::db::PostgresConfig;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "VALIS_CONFIG";

const DEFAULT_LOCATIONS: [&str; 3] = ["valis.toml", "backend/valis.toml", "../valis.toml"];

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub local: LocalSettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub access: AccessSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

/// In-memory repository settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSettings {
    /// JSON file with an array of targets to seed the repository with.
    #[serde(default)]
    pub targets_file: Option<PathBuf>,
}

/// Postgres connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

/// Path registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessSettings {
    #[serde(default = "default_release")]
    pub release: String,
    #[serde(default = "default_sas_base_dir")]
    pub sas_base_dir: PathBuf,
    #[serde(default = "default_url_base")]
    pub url_base: String,
    /// Values for `$VAR` references in templates.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
    /// Path name to template.
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self {
            release: default_release(),
            sas_base_dir: default_sas_base_dir(),
            url_base: default_url_base(),
            environment: BTreeMap::new(),
            templates: BTreeMap::new(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_release() -> String {
    "sdsswork".to_string()
}

fn default_sas_base_dir() -> PathBuf {
    PathBuf::from("/")
}

fn default_url_base() -> String {
    "https://data.sdss5.org/sas".to_string()
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `valis.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        for path in DEFAULT_LOCATIONS.iter().map(Path::new) {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Err(RepositoryError::configuration(
            "No valis.toml found in standard locations",
        ))
    }

    /// Resolve configuration the way the server binary does.
    ///
    /// An explicit `VALIS_CONFIG` file must load; otherwise the default
    /// locations are tried and defaults used when nothing is found.
    /// Environment overrides are applied last.
    pub fn load() -> Result<Self, RepositoryError> {
        let mut config = match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if any_default_exists() => Self::from_default_location()?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `HOST`, `PORT`, `REPOSITORY_TYPE`, `DATABASE_URL` /
    /// `PG_DATABASE_URL` and `SAS_BASE_DIR` on top of file values.
    pub fn apply_env_overrides(&mut self) -> Result<(), RepositoryError> {
        if let Ok(host) = std::env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port.parse().map_err(|_| {
                RepositoryError::configuration(format!("PORT must be a valid port number, got '{}'", port))
            })?;
        }
        if let Ok(repo_type) = std::env::var("REPOSITORY_TYPE") {
            self.repository.repo_type = repo_type;
        }
        if let Ok(url) = std::env::var("DATABASE_URL").or_else(|_| std::env::var("PG_DATABASE_URL")) {
            self.postgres.database_url = url;
        }
        if let Ok(dir) = std::env::var("SAS_BASE_DIR") {
            self.access.sas_base_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(RepositoryError::configuration)
    }

    /// Convert to PostgresConfig if this is a Postgres configuration.
    pub fn to_postgres_config(&self) -> Result<Option<PostgresConfig>, RepositoryError> {
        if self.repository_type()? != RepositoryType::Postgres {
            return Ok(None);
        }

        if self.postgres.database_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres repository requires 'postgres.database_url' setting",
            ));
        }

        Ok(Some(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
            min_pool_size: self.postgres.min_connections,
            connection_timeout_sec: self.postgres.connect_timeout,
            idle_timeout_sec: self.postgres.idle_timeout,
        }))
    }
}

fn any_default_exists() -> bool {
    DEFAULT_LOCATIONS.iter().any(|p| Path::new(p).exists())
}
