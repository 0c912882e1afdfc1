//! Configuration loading for the monitor binary.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Monitor configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Directory containing WhatsApp's leveldb log files. When unset,
    /// the platform default is used (see [`default_watch_dir`]).
    pub watch_dir: Option<PathBuf>,
    /// Debounce window for filesystem events, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            watch_dir: None,
            debounce_ms: 100,
        }
    }
}

/// Default location of WhatsApp's IndexedDB leveldb directory.
///
/// Resolves to `<data_dir>/WhatsApp/IndexedDB/file__0.indexeddb.leveldb`
/// (the Roaming profile on Windows). Returns `None` when the platform
/// data directory cannot be determined.
#[must_use]
pub fn default_watch_dir() -> Option<PathBuf> {
    let data_dir = dirs::data_dir()?;
    Some(
        data_dir
            .join("WhatsApp")
            .join("IndexedDB")
            .join("file__0.indexeddb.leveldb"),
    )
}

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .wa-log-monitor.toml
        search_paths.push(PathBuf::from(".wa-log-monitor.toml"));

        // 2. User config directory: ~/.config/wa-log-monitor/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("wa-log-monitor").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(&self) -> Result<MonitorConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(MonitorConfig::default())
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &PathBuf) -> Result<MonitorConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert!(config.watch_dir.is_none());
        assert_eq!(config.debounce_ms, 100);
    }

    #[test]
    fn test_config_loader_default_paths() {
        let loader = ConfigLoader::new();
        assert!(!loader.search_paths().is_empty());
        assert!(loader.search_paths()[0].ends_with(".wa-log-monitor.toml"));
    }

    #[test]
    fn test_config_loader_returns_defaults_when_no_file() {
        let loader = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"));
        let config = loader.load().unwrap();
        assert!(config.watch_dir.is_none());
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            watch_dir = "/data/whatsapp/leveldb"
            debounce_ms = 250
        "#;

        let config: MonitorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.watch_dir,
            Some(PathBuf::from("/data/whatsapp/leveldb"))
        );
        assert_eq!(config.debounce_ms, 250);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms = 50").unwrap();
        file.flush().unwrap();

        let loader = ConfigLoader::with_path(file.path().to_path_buf());
        let config = loader.load().unwrap();
        assert_eq!(config.debounce_ms, 50);
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms = \"not a number\"").unwrap();
        file.flush().unwrap();

        let loader = ConfigLoader::with_path(file.path().to_path_buf());
        assert!(matches!(
            loader.load(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_default_watch_dir_shape() {
        if let Some(dir) = default_watch_dir() {
            assert!(dir.ends_with("WhatsApp/IndexedDB/file__0.indexeddb.leveldb"));
        }
    }
}
