//! Configuration for the course store.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (COURSE_HOME, COURSE_STORAGE, COURSE_STORAGE_KEY)
//! 2. Config file (.course/config.yaml)
//! 3. Defaults (~/.course, file backend, "course-storage")
//!
//! Config file discovery:
//! - Searches current directory and parents for .course/config.yaml
//! - `paths.home` is relative to the .course/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::store::{FileStorage, SnapshotStorage, SqliteStorage, DEFAULT_STORAGE_KEY};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Store home directory (relative to .course/)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: Option<StorageBackend>,
    pub key: Option<String>,
}

/// Which storage area holds the snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" | "json" => Ok(StorageBackend::File),
            "sqlite" | "db" => Ok(StorageBackend::Sqlite),
            _ => anyhow::bail!("Unknown storage backend: {}", s),
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::File => write!(f, "file"),
            StorageBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the store home
    pub home: PathBuf,
    /// Storage backend for snapshots
    pub backend: StorageBackend,
    /// Key the snapshot is stored under
    pub storage_key: String,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// SQLite database path used by the sqlite backend
    pub fn sqlite_path(&self) -> PathBuf {
        self.home.join("course.sqlite")
    }

    /// Open the configured storage backend
    pub fn open_storage(&self) -> Result<Box<dyn SnapshotStorage>> {
        let storage: Box<dyn SnapshotStorage> = match self.backend {
            StorageBackend::File => Box::new(FileStorage::new(&self.home)),
            StorageBackend::Sqlite => {
                let path = self.sqlite_path();
                Box::new(
                    SqliteStorage::open(&path)
                        .with_context(|| format!("Failed to open database: {}", path.display()))?,
                )
            }
        };
        Ok(storage)
    }
}

impl ConfigFile {
    /// Load and parse a `.course/config.yaml`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// `paths.home` resolved against the `.course/` directory holding `path`
    fn home_relative_to(&self, path: &Path) -> Option<PathBuf> {
        let home = PathBuf::from(self.paths.home.as_deref()?);
        if home.is_absolute() {
            return Some(home);
        }

        let course_dir = path.parent().unwrap_or(Path::new("."));
        let joined = course_dir.join(&home);
        Some(joined.canonicalize().unwrap_or(joined))
    }
}

/// Values taken from COURSE_* environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub home: Option<PathBuf>,
    pub backend: Option<String>,
    pub storage_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            home: std::env::var_os("COURSE_HOME").map(PathBuf::from),
            backend: std::env::var("COURSE_STORAGE").ok(),
            storage_key: std::env::var("COURSE_STORAGE_KEY").ok(),
        }
    }
}

impl ResolvedConfig {
    /// Layer env overrides over the config file over defaults
    pub fn resolve(
        file: Option<(PathBuf, ConfigFile)>,
        env: &EnvOverrides,
        default_home: PathBuf,
    ) -> Result<Self> {
        let (config_file, file) = match file {
            Some((path, file)) => (Some(path), Some(file)),
            None => (None, None),
        };
        let storage = file.as_ref().and_then(|f| f.storage.as_ref());

        let home = env
            .home
            .clone()
            .or_else(|| {
                let path = config_file.as_deref()?;
                file.as_ref()?.home_relative_to(path)
            })
            .unwrap_or(default_home);

        let backend = match env.backend.as_deref() {
            Some(value) => value
                .parse::<StorageBackend>()
                .context("Invalid COURSE_STORAGE environment variable")?,
            None => storage.and_then(|s| s.backend).unwrap_or_default(),
        };

        let storage_key = env
            .storage_key
            .clone()
            .or_else(|| storage.and_then(|s| s.key.clone()))
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

        Ok(Self {
            home,
            backend,
            storage_key,
            config_file,
        })
    }
}

/// Nearest `.course/config.yaml` at or above `start`
fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(".course").join("config.yaml"))
        .find(|path| path.exists())
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".course");

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let file = match find_config_file(&cwd) {
        Some(path) => {
            let file = ConfigFile::load(&path)?;
            Some((path, file))
        }
        None => None,
    };

    ResolvedConfig::resolve(file, &EnvOverrides::from_env(), default_home)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    CONFIG
        .get_or_init(|| load_config().map_err(|e| format!("{:#}", e)))
        .as_ref()
        .map_err(|e| anyhow::anyhow!("{}", e))
}

/// Load configuration again, bypassing the cache
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
