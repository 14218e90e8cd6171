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

/// Mirror of the engine's export heading style; this crate does not depend on the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    #[default]
    Atx,
    Setext,
}

/// Markdown export defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub gfm: bool,
    pub heading_style: HeadingStyle,
    pub escape: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            heading_style: HeadingStyle::Atx,
            escape: true,
        }
    }
}

/// Classes for the block drag handle and drop indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragHandleConfig {
    pub handle_class: String,
    pub drop_indicator_class: String,
}

impl Default for DragHandleConfig {
    fn default() -> Self {
        Self {
            handle_class: "rte-drag-handle".to_string(),
            drop_indicator_class: "rte-drop-indicator".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCountConfig {
    pub words_per_minute: u32,
}

impl Default for WordCountConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}

/// Presentation context handed to each editor instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// `en` or `zh-TW`
    pub locale: String,
    pub theme: String,
    /// `light`, `dark` or `auto`
    pub theme_mode: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            theme: "default".to_string(),
            theme_mode: "light".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory relative document paths are resolved against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_path: Option<PathBuf>,
    pub export: ExportConfig,
    pub drag_handle: DragHandleConfig,
    pub word_count: WordCountConfig,
    pub editor: EditorConfig,
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

        // Expand shell variables and tilde in the documents directory
        config.documents_path = config
            .documents_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
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

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/rteditor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Resolves a document path given on the command line. Relative paths
    /// that do not exist as given are looked up under `documents_path`.
    pub fn resolve_document(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.exists() {
            return path.to_path_buf();
        }
        match &self.documents_path {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/rteditor/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.export.gfm);
        assert_eq!(config.word_count.words_per_minute, 200);
        assert_eq!(config.drag_handle.handle_class, "rte-drag-handle");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[export]
heading_style = "setext"

[editor]
locale = "zh-TW"
"#,
        )
        .unwrap();

        assert_eq!(config.export.heading_style, HeadingStyle::Setext);
        assert!(config.export.escape);
        assert_eq!(config.editor.locale, "zh-TW");
        assert_eq!(config.editor.theme, "default");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut original = Config::default();
        original.documents_path = Some(PathBuf::from("/tmp/docs"));
        original.word_count.words_per_minute = 250;

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("RTEDITOR_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$RTEDITOR_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path).unwrap();
        assert_eq!(expanded, PathBuf::from("/test/env/path/subdir"));

        unsafe {
            env::remove_var("RTEDITOR_TEST_VAR");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[export\ngfm = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::default();
        test_config.export.gfm = false;
        test_config.editor.theme_mode = "dark".to_string();

        // Saving creates the parent directory
        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_documents_path_expanded_on_load() {
        unsafe {
            env::set_var("RTEDITOR_DOCS_ROOT", "/custom/docs");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "documents_path = \"$RTEDITOR_DOCS_ROOT/essays\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(config.documents_path, Some(PathBuf::from("/custom/docs/essays")));
        assert_eq!(
            config.resolve_document(Path::new("draft.json")),
            PathBuf::from("/custom/docs/essays/draft.json")
        );

        unsafe {
            env::remove_var("RTEDITOR_DOCS_ROOT");
        }
    }
}
