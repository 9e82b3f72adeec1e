//! Review table rendering.
//!
//! This module renders the rows produced by the summary engine as a
//! Markdown table, a JSON row list, or the key/value payload that is
//! handed to a backend.

use crate::models::SummaryRow;
use crate::summary::build_payload;
use anyhow::Result;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Generate the Markdown review table.
pub fn generate_markdown_summary(rows: &[SummaryRow], generated_at: DateTime<Local>) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Rapport d'intervention\n\n");
    output.push_str(&format!(
        "*Généré le {}*\n\n",
        generated_at.format("%d/%m/%Y à %H:%M:%S")
    ));

    output.push_str(&generate_table(rows));

    output
}

/// Generate the table section alone, as shown while the form is edited.
pub fn generate_table(rows: &[SummaryRow]) -> String {
    if rows.is_empty() {
        return "_Aucune information saisie._\n".to_string();
    }

    let mut table = String::new();
    table.push_str("| Champ | Valeur |\n");
    table.push_str("|---|---|\n");
    for row in rows {
        table.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&row.label),
            escape_cell(&row.value)
        ));
    }

    table
}

/// Keep a value on one table line without breaking the column layout.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generate the review table as a JSON array of `{label, value}`.
pub fn generate_json_summary(rows: &[SummaryRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).map_err(Into::into)
}

/// Generate the backend payload (normalized keys) as JSON.
pub fn generate_payload_json(rows: &[SummaryRow]) -> Result<String> {
    to_pretty_json(&build_payload(rows))
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// Write rendered content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
