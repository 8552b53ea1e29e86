// Tue Jan 13 2026 - Alex

use crate::comm::Rank;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the demonstration driver. The gather library itself takes
/// everything it needs from the communicator passed to each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub participants: usize,
    pub root: Rank,
    pub steps: usize,
    pub max_records_per_rank: usize,
    pub verify: bool,
    pub verbosity: u8,
    pub summary_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            participants: num_cpus::get().clamp(2, 8),
            root: 0,
            steps: 20,
            max_records_per_rank: 64,
            verify: true,
            verbosity: 0,
            summary_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_participants(mut self, participants: usize) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_root(mut self, root: Rank) -> Self {
        self.root = root;
        self
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let ext = path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "json" => serde_json::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::IoError(e.to_string()))?;
            }
        }

        fs::write(path, contents)
            .map_err(|e| ConfigError::IoError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.participants == 0 {
            return Err(ConfigError::ValidationError("participants must be > 0".to_string()));
        }
        if self.root >= self.participants {
            return Err(ConfigError::ValidationError(format!(
                "root {} is not a rank of a {}-participant group",
                self.root, self.participants
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NotFound(PathBuf),
    IoError(String),
    ParseError(String),
    SerializeError(String),
    UnsupportedFormat(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(path) => write!(f, "Config file not found: {:?}", path),
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ConfigError::UnsupportedFormat(fmt) => write!(f, "Unsupported format: {}", fmt),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_root_outside_group() {
        let config = Config::new().with_participants(2).with_root(2);
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "participants": 3, "steps": 5 }"#).unwrap();
        assert_eq!(config.participants, 3);
        assert_eq!(config.steps, 5);
        assert!(config.verify);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("collective-gather-{}.json", std::process::id()));
        let config = Config::new().with_participants(5).with_root(4).with_steps(3);

        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension() {
        let path = std::env::temp_dir().join(format!("collective-gather-{}.yaml", std::process::id()));
        fs::write(&path, "participants: 2").unwrap();
        let result = Config::load(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(result, Err(ConfigError::UnsupportedFormat("yaml".to_string())));
    }
}
