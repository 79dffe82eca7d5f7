use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Validated by build.rs.
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub html: HtmlConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Language reported for fences without an info string.
    pub default_language: String,
    /// Deepest bold/italic nesting; deeper delimiters stay literal.
    pub max_inline_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_language: "plaintext".to_string(),
            max_inline_depth: crate::inline::DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HtmlConfig {
    pub code_class_prefix: String,
    /// Empty means no wrapper element.
    pub wrapper_class: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            code_class_prefix: "language-".to_string(),
            wrapper_class: String::new(),
        }
    }
}

impl Config {
    /// The options shipped in `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found or invalid.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }

    /// Load config from a TOML file the user asked for explicitly.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn compiled_default_matches_code_defaults() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: Config = toml::from_str("[html]\nwrapper_class = \"chat-md\"\n").unwrap();
        assert_eq!(config.html.wrapper_class, "chat-md");
        assert_eq!(config.html.code_class_prefix, "language-");
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/chatmark.toml"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_invalid_file_gives_defaults() {
        let file = write_config("[parser\nmax_inline_depth = ");
        assert_eq!(Config::load(file.path()), Config::default());
    }

    #[test]
    fn load_reads_values() {
        let file = write_config("[parser]\ndefault_language = \"text\"\nmax_inline_depth = 2\n");
        let config = Config::load(file.path());
        assert_eq!(config.parser.default_language, "text");
        assert_eq!(config.parser.max_inline_depth, 2);
    }

    #[test]
    fn from_file_reports_errors() {
        assert!(Config::from_file(Path::new("/nonexistent/chatmark.toml")).is_err());

        let file = write_config("[parser]\nmax_inline_depth = \"deep\"\n");
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("invalid config"));
    }
}
