use crate::app_dirs::AppDirs;
use crate::generator::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable holding the online provider credential
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub database_path: Option<PathBuf>,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8081,
            database_path: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            history_limit: 10,
        }
    }
}

impl Config {
    /// Configured database file, or the per-user default location
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .or_else(AppDirs::db_path)
            .unwrap_or_else(|| PathBuf::from("figure10.db"))
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Credential from the environment; empty values count as unset
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("figure10_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("ignoring invalid config {}: {}", self.path.display(), e),
            }
        }
        Config::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_full_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            bind: "0.0.0.0".into(),
            port: 9000,
            database_path: Some(dir.path().join("typing.db")),
            model: "gemini-test".into(),
            api_base_url: "http://localhost:1234".into(),
            request_timeout_secs: 5,
            history_limit: 25,
        };
        fs::write(&path, serde_json::to_vec_pretty(&cfg).unwrap()).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn missing_or_invalid_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, b"{ not json").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"port": 3000}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.bind, "127.0.0.1");
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.address(), "127.0.0.1:3000");
    }

    #[test]
    fn explicit_database_path_wins() {
        let cfg = Config {
            database_path: Some(PathBuf::from("/tmp/x.db")),
            ..Default::default()
        };
        assert_eq!(cfg.resolved_database_path(), PathBuf::from("/tmp/x.db"));
    }
}
