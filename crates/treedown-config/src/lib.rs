use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Baseline dialect switches, one per `[compile]` key.
///
/// Missing keys fall back to the standard dialect: tables, fenced code,
/// and div quotes on; definition lists and anchors off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileDefaults {
    #[serde(default = "default_on")]
    pub tables: bool,
    #[serde(default = "default_on")]
    pub fenced_code: bool,
    #[serde(default = "default_on")]
    pub div_quotes: bool,
    #[serde(default)]
    pub definition_lists: bool,
    #[serde(default)]
    pub anchors: bool,
}

impl Default for CompileDefaults {
    fn default() -> Self {
        Self {
            tables: true,
            fenced_code: true,
            div_quotes: true,
            definition_lists: false,
            anchors: false,
        }
    }
}

fn default_on() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compile: CompileDefaults,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/treedown");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        // Should contain the expected config file name
        assert!(path_str.ends_with(".config/treedown/config.toml"));
    }

    #[test]
    fn test_defaults_match_the_standard_dialect() {
        let config = Config::default();
        assert!(config.compile.tables);
        assert!(config.compile.fenced_code);
        assert!(config.compile.div_quotes);
        assert!(!config.compile.definition_lists);
        assert!(!config.compile.anchors);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_empty_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "").unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[compile]\ntables = false\n").unwrap();

        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert!(!loaded.compile.tables);
        assert!(loaded.compile.fenced_code);
        assert!(loaded.compile.div_quotes);
    }

    #[test]
    fn test_every_switch_can_be_set() {
        let config_content = r#"
[compile]
tables = false
fenced_code = false
div_quotes = false
definition_lists = true
anchors = true
"#;

        let config: Config = toml::from_str(config_content).unwrap();

        assert!(!config.compile.tables);
        assert!(!config.compile.fenced_code);
        assert!(!config.compile.div_quotes);
        assert!(config.compile.definition_lists);
        assert!(config.compile.anchors);
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[compile\ntables = ???\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            compile: CompileDefaults {
                tables: false,
                fenced_code: true,
                div_quotes: false,
                definition_lists: true,
                anchors: false,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }
}
