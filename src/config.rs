//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.fieldreport.toml` files.

use crate::cli::OutputFormat;
use crate::debounce::DEFAULT_THROTTLE_MS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".fieldreport.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Review table settings.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Where to write the rendered report (stdout when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Rendering of the report.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Review table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Quiet window before the table is refreshed in interactive mode.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Extra values treated as "no answer".
    #[serde(default)]
    pub placeholders: Vec<String>,

    /// Shown for comments when they are left empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_fallback: Option<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            placeholders: Vec::new(),
            comments_fallback: None,
        }
    }
}

fn default_throttle_ms() -> u64 {
    DEFAULT_THROTTLE_MS
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// JSON-lines file receiving exported reports.
    #[serde(default = "default_outbox")]
    pub outbox: String,

    /// Table name stamped on each exported record.
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            outbox: default_outbox(),
            table: default_table(),
        }
    }
}

fn default_outbox() -> String {
    "fieldreport_outbox.jsonl".to_string()
}

fn default_table() -> String {
    "tis_interventions".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(throttle_ms) = args.throttle_ms {
            self.summary.throttle_ms = throttle_ms;
        }
        if let Some(ref outbox) = args.outbox {
            self.export.outbox = outbox.display().to_string();
        }
        if let Some(ref table) = args.table {
            self.export.table = table.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.summary.throttle_ms, 300);
        assert_eq!(config.export.table, "tis_interventions");
        assert_eq!(config.general.format, OutputFormat::Markdown);
        assert!(config.summary.comments_fallback.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "rapport.md"
format = "json"
verbose = true

[summary]
throttle_ms = 500
placeholders = ["Choisir..."]
comments_fallback = "Pas de commentaire"

[export]
table = "interventions_test"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output.as_deref(), Some("rapport.md"));
        assert_eq!(config.general.format, OutputFormat::Json);
        assert!(config.general.verbose);
        assert_eq!(config.summary.throttle_ms, 500);
        assert_eq!(config.summary.placeholders, vec!["Choisir..."]);
        assert_eq!(
            config.summary.comments_fallback.as_deref(),
            Some("Pas de commentaire")
        );
        assert_eq!(config.export.table, "interventions_test");
        assert_eq!(config.export.outbox, "fieldreport_outbox.jsonl");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[summary]"));
        assert!(toml_str.contains("[export]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.summary.throttle_ms, 300);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[summary]\nthrottle_ms = 120\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.summary.throttle_ms, 120);

        std::fs::write(&path, "[summary\n").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
