//! Configuration types for logexport.
//!
//! [`Config::load`] layers an optional TOML file (and `LOGEXPORT_*`
//! environment overrides, e.g. `LOGEXPORT_PIPELINE__ON_ERROR=abort`) on top
//! of the built-in defaults. [`Config::defaults`]
//! returns the same defaults without touching the filesystem (useful in tests).

use crate::extract::ExtractorOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[pipeline]
channel_capacity = 1024
on_error         = "skip"

[output]
pretty_schema = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What the pipeline does with a record it cannot turn into a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Log it, dead-letter it if configured, and carry on.
    #[default]
    Skip,
    /// Stop the run.
    Abort,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default)]
    pub on_error: OnError,
}

fn default_channel_capacity() -> usize { 1024 }

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            on_error: OnError::default(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty_schema")]
    pub pretty_schema: bool,
    /// Module id for rows that carry none. Daily tables are keyed by module,
    /// so `"default"` is the usual choice; unset leaves the column absent.
    #[serde(default)]
    pub default_module_id: Option<String>,
}

fn default_pretty_schema() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_schema: default_pretty_schema(),
            default_module_id: None,
        }
    }
}

impl OutputConfig {
    pub fn extractor_options(&self) -> ExtractorOptions {
        ExtractorOptions {
            default_module_id: self.default_module_id.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load `path` (or [`config_path`] when `None`) layered on top of the
    /// built-in defaults. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .add_source(
                config::Environment::with_prefix("LOGEXPORT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/logexport/config.toml`, falling back to `~/.config`.
pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logexport")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.pipeline.channel_capacity, 1024);
        assert_eq!(cfg.pipeline.on_error, OnError::Skip);
        assert!(cfg.output.pretty_schema);
        assert_eq!(cfg.output.default_module_id, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[pipeline]\non_error = \"abort\"\n\n[output]\ndefault_module_id = \"default\"\n",
        )
        .unwrap();
        let cfg = Config::load(Some(&path)).unwrap();

        assert_eq!(cfg.pipeline.on_error, OnError::Abort);
        assert_eq!(cfg.pipeline.channel_capacity, 1024);
        assert_eq!(
            cfg.output.extractor_options().default_module_id.as_deref(),
            Some("default")
        );
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[output]\npretty_schema = false\n").unwrap();

        std::env::set_var("LOGEXPORT_PIPELINE__ON_ERROR", "abort");
        let cfg = Config::load(Some(&path));
        std::env::remove_var("LOGEXPORT_PIPELINE__ON_ERROR");
        let cfg = cfg.unwrap();

        assert_eq!(cfg.pipeline.on_error, OnError::Abort);
        assert!(!cfg.output.pretty_schema);
    }

    #[test]
    fn missing_file_is_defaults() {
        let cfg = Config::load(Some(Path::new("/nonexistent/logexport/config.toml"))).unwrap();
        assert!(cfg.output.pretty_schema);
    }
}
