use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every granularity the reader knows, in the default switching order.
pub const DEFAULT_GRANULARITIES: [&str; 4] = ["node", "word", "sentence", "cell"];

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

    #[error("Config file at {config_path}: default granularity '{label}' is not in the granularity list")]
    DefaultNotListed { config_path: PathBuf, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Granularity labels in switching order
    pub granularities: Vec<String>,
    /// Granularity to start in; the first listed one when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_granularity: Option<String>,
    /// Jump to the other end of the document instead of stopping at it
    pub wrap: bool,
    /// Document to open when none is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            granularities: DEFAULT_GRANULARITIES.iter().map(|s| s.to_string()).collect(),
            default_granularity: None,
            wrap: false,
            document: None,
        }
    }
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

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        if let Some(label) = &config.default_granularity
            && !config.granularities.contains(label)
        {
            return Err(ConfigError::DefaultNotListed {
                config_path: config_path.to_path_buf(),
                label: label.clone(),
            });
        }

        // Expand shell variables and tilde in the start document
        config.document = config
            .document
            .map(|document| Self::expand_path(&document).unwrap_or(document));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// The configuration file if there is one, defaults otherwise.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_or_default_from_path(Self::config_path())
    }

    pub fn load_or_default_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        Ok(Self::load_from_path(config_path)?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/docwalk");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The granularity to start in.
    pub fn starting_granularity(&self) -> Option<&str> {
        self.default_granularity
            .as_deref()
            .or_else(|| self.granularities.first().map(String::as_str))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, content).unwrap();
        (temp_dir, config_file)
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/docwalk/config.toml"));
    }

    #[test]
    fn test_defaults_list_every_granularity() {
        let config = Config::default();
        assert_eq!(config.granularities, DEFAULT_GRANULARITIES);
        assert_eq!(config.starting_granularity(), Some("node"));
        assert!(!config.wrap);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let (_dir, config_file) = write_config("");
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let (_dir, config_file) = write_config(
            r#"
granularities = ["word", "cell"]
wrap = true
"#,
        );
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded.granularities, vec!["word", "cell"]);
        assert!(loaded.wrap);
        assert_eq!(loaded.starting_granularity(), Some("word"));
        assert_eq!(loaded.document, None);
    }

    #[test]
    fn test_default_granularity_must_be_listed() {
        let (_dir, config_file) = write_config(
            r#"
granularities = ["word"]
default_granularity = "cell"
"#,
        );
        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultNotListed { ref label, .. } if label == "cell"));
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let (_dir, config_file) = write_config("wrap = \"sometimes\"\n");
        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nonexistent.toml");
        assert_eq!(Config::load_or_default_from_path(&missing).unwrap(), Config::default());

        let (_dir, config_file) = write_config("wrap = true\n");
        assert!(Config::load_or_default_from_path(&config_file).unwrap().wrap);

        let (_dir, broken) = write_config("wrap = \"sometimes\"\n");
        assert!(Config::load_or_default_from_path(&broken).is_err());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            granularities: vec!["sentence".to_string(), "node".to_string()],
            default_granularity: Some("node".to_string()),
            wrap: true,
            document: Some(PathBuf::from("/tmp/readme.md")),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_document_with_tilde_is_expanded() {
        let (_dir, config_file) = write_config("document = \"~/notes/today.md\"\n");
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        let document = loaded.document.unwrap();
        assert!(!document.to_string_lossy().starts_with('~'));
        assert!(document.to_string_lossy().ends_with("notes/today.md"));
    }

    #[test]
    fn test_document_with_env_var_is_expanded() {
        unsafe {
            env::set_var("DOCWALK_TEST_DOCS", "/custom/docs");
        }

        let (_dir, config_file) = write_config("document = \"$DOCWALK_TEST_DOCS/guide.md\"\n");
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(loaded.document, Some(PathBuf::from("/custom/docs/guide.md")));

        unsafe {
            env::remove_var("DOCWALK_TEST_DOCS");
        }
    }

    #[test]
    fn test_unknown_variable_fails_expansion() {
        let path = PathBuf::from("$DOCWALK_SURELY_UNSET_VARIABLE/x.md");
        assert_eq!(Config::expand_path(&path), None);
    }
}
