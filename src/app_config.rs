use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::transform::{TextTransformer, DEFAULT_CLOZE_NUMBER, DEFAULT_HIGHLIGHT_TAG};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Root directory of the note vault
    #[serde(default)]
    pub vault_path: PathBuf,

    /// Directory the export file is written to
    #[serde(default)]
    pub export_dir: PathBuf,

    /// Tag that selects a note for export
    #[serde(default = "default_export_tag")]
    pub export_tag: String,

    /// Extension of note files, without the dot
    #[serde(default = "default_markdown_extension")]
    pub markdown_extension: String,

    /// Directory names whose whole subtree is skipped
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Cloze number used for every highlighted span in the Text field
    #[serde(default = "default_cloze_number")]
    pub cloze_number: u32,

    /// HTML element wrapping highlights in the Translation field
    #[serde(default = "default_highlight_tag")]
    pub highlight_tag: String,

    /// Prefix of the export file name
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Replace an existing export file with the same batch id
    #[serde(default)]
    pub force_overwrite: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_export_tag() -> String {
    "#anki/export".to_string()
}

fn default_markdown_extension() -> String {
    "md".to_string()
}

fn default_skip_dirs() -> Vec<String> {
    // Obsidian keeps its settings and plugins here
    vec![".obsidian".to_string()]
}

fn default_cloze_number() -> u32 {
    DEFAULT_CLOZE_NUMBER
}

fn default_highlight_tag() -> String {
    DEFAULT_HIGHLIGHT_TAG.to_string()
}

fn default_file_prefix() -> String {
    "obsidian2anki_export__".to_string()
}

impl Config {
    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path.as_ref(), config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.vault_path.as_os_str().is_empty() {
            return Err(anyhow!("Vault path is required (set OBSIDIAN_VAULT or --vault)"));
        }

        if self.export_dir.as_os_str().is_empty() {
            return Err(anyhow!("Export directory is required (set EXPORT_DIR or --export-dir)"));
        }

        if self.export_tag.is_empty() {
            return Err(anyhow!("Export tag must not be empty"));
        }

        // A tag with whitespace could never match as a single token
        if self.export_tag.chars().any(char::is_whitespace) {
            return Err(anyhow!("Export tag must not contain whitespace: {:?}", self.export_tag));
        }

        if self.markdown_extension.is_empty() {
            return Err(anyhow!("Markdown extension must not be empty"));
        }

        if self.cloze_number == 0 {
            return Err(anyhow!("Cloze number must be at least 1"));
        }

        if self.highlight_tag.is_empty() || !self.highlight_tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("Highlight tag must be an alphanumeric element name: {:?}", self.highlight_tag));
        }

        Ok(())
    }

    /// Field rewrites configured for this run
    pub fn text_transformer(&self) -> TextTransformer {
        TextTransformer::new(self.cloze_number, self.highlight_tag.clone())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            vault_path: PathBuf::new(),
            export_dir: PathBuf::new(),
            export_tag: default_export_tag(),
            markdown_extension: default_markdown_extension(),
            skip_dirs: default_skip_dirs(),
            cloze_number: default_cloze_number(),
            highlight_tag: default_highlight_tag(),
            file_prefix: default_file_prefix(),
            force_overwrite: false,
            log_level: LogLevel::default(),
        }
    }
}
