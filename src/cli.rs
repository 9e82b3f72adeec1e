//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// FieldReport - intervention reports for field technicians
///
/// Builds the review table of an intervention report from a recorded
/// session or from interactive input, and exports the report payload.
///
/// Examples:
///   fieldreport --session intervention.json
///   fieldreport --session intervention.json --format payload -o payload.json
///   fieldreport --session intervention.json --export
///   fieldreport --interactive --throttle-ms 500
///   fieldreport --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Session file (JSON) to replay
    ///
    /// Holds the form field values and the ordered list of selection changes.
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present_any = ["interactive", "init_config"]
    )]
    pub session: Option<PathBuf>,

    /// Edit the form line by line from stdin
    #[arg(short, long, conflicts_with = "session")]
    pub interactive: bool,

    /// Output file for the rendered report (stdout if not set)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json, payload)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Export the report to the outbox and clear selection histories
    #[arg(long)]
    pub export: bool,

    /// Outbox file receiving exported reports (JSON lines)
    #[arg(long, value_name = "FILE", env = "FIELDREPORT_OUTBOX")]
    pub outbox: Option<PathBuf>,

    /// Table name stamped on exported reports
    #[arg(long, value_name = "NAME")]
    pub table: Option<String>,

    /// Quiet window before the review table refreshes in interactive mode
    #[arg(long, value_name = "MS")]
    pub throttle_ms: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .fieldreport.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .fieldreport.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown review table (default)
    #[default]
    Markdown,
    /// JSON list of label/value rows
    Json,
    /// JSON object with normalized keys, as sent to a backend
    Payload,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.session.is_none() && !self.interactive {
            return Err("Either --session or --interactive is required".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(throttle) = self.throttle_ms {
            if throttle == 0 {
                return Err("Throttle must be at least 1 ms".to_string());
            }
        }

        if let Some(ref table) = self.table {
            if table.trim().is_empty() {
                return Err("Table name cannot be empty".to_string());
            }
        }

        // Validate session file if provided
        if let Some(ref session) = self.session {
            if !session.exists() {
                return Err(format!("Session file does not exist: {}", session.display()));
            }
            if !session.is_file() {
                return Err(format!("Session path is not a file: {}", session.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
