//! Summary aggregation.
//!
//! The engine keeps the two selection histories of a report and turns the
//! current form fields into the ordered rows of the review table.

use crate::models::{
    FormFields, SelectionEvent, SelectionHistory, SelectionKind, SummaryRow,
    DEFAULT_PLACEHOLDERS, LABEL_COMMENTS, LABEL_INTERVENTION_HISTORY, LABEL_PROBLEM_HISTORY,
};
use chrono::{DateTime, Local};
use tracing::debug;

/// Holds the selection histories for one reporting session.
#[derive(Debug, Clone)]
pub struct SummaryEngine {
    interventions: SelectionHistory,
    problems: SelectionHistory,
    placeholders: Vec<String>,
    comments_fallback: Option<String>,
}

impl Default for SummaryEngine {
    fn default() -> Self {
        Self {
            interventions: SelectionHistory::new(),
            problems: SelectionHistory::new(),
            placeholders: DEFAULT_PLACEHOLDERS.iter().map(|s| s.to_string()).collect(),
            comments_fallback: None,
        }
    }
}

impl SummaryEngine {
    /// Create an engine with empty histories and the default placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add values to treat as "no answer", on top of the defaults.
    pub fn with_placeholders<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for placeholder in extra {
            let placeholder = placeholder.into();
            if !self.placeholders.contains(&placeholder) {
                self.placeholders.push(placeholder);
            }
        }
        self
    }

    /// Text shown for comments when the technician left them empty.
    pub fn with_comments_fallback(mut self, fallback: Option<String>) -> Self {
        self.comments_fallback = fallback.filter(|f| !f.is_empty());
        self
    }

    /// Record a selection made now.
    pub fn record_selection(&mut self, kind: SelectionKind, value: &str, display_text: &str) {
        self.record_selection_at(kind, value, display_text, Local::now());
    }

    /// Record a selection made at `at`. Empty values are placeholder
    /// selections and leave the history untouched.
    pub fn record_selection_at(
        &mut self,
        kind: SelectionKind,
        value: &str,
        display_text: &str,
        at: DateTime<Local>,
    ) {
        if value.is_empty() {
            debug!("Ignoring empty {} selection", kind);
            return;
        }

        let history = self.history_mut(kind);
        history.push(SelectionEvent {
            value: value.to_string(),
            display_text: display_text.to_string(),
            timestamp: at,
        });
        debug!("Recorded {} selection '{}' ({} total)", kind, value, history.len());
    }

    /// Build the review table for the given field values.
    pub fn build_snapshot(&self, fields: &FormFields) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = fields
            .labeled()
            .into_iter()
            .map(|(label, value)| match (&self.comments_fallback, label) {
                (Some(fallback), LABEL_COMMENTS) if value.is_empty() => {
                    SummaryRow::new(label, fallback.as_str())
                }
                _ => SummaryRow::new(label, value),
            })
            .collect();

        if let Some(changes) = self.interventions.earlier_changes() {
            rows.push(SummaryRow::new(LABEL_INTERVENTION_HISTORY, changes));
        }
        if let Some(changes) = self.problems.earlier_changes() {
            rows.push(SummaryRow::new(LABEL_PROBLEM_HISTORY, changes));
        }

        rows.retain(|row| self.is_reportable(&row.value));
        rows
    }

    /// Clear both histories. Called once a report has been accepted.
    pub fn reset_histories(&mut self) {
        if self.interventions.is_empty() && self.problems.is_empty() {
            debug!("Selection histories already empty");
            return;
        }
        self.interventions.clear();
        self.problems.clear();
        debug!("Selection histories reset");
    }

    /// Whether a value is a real answer (non-empty, not a placeholder).
    pub fn is_reportable(&self, value: &str) -> bool {
        !value.is_empty() && !self.placeholders.iter().any(|p| p == value)
    }

    pub fn history(&self, kind: SelectionKind) -> &SelectionHistory {
        match kind {
            SelectionKind::Intervention => &self.interventions,
            SelectionKind::Problem => &self.problems,
        }
    }

    fn history_mut(&mut self, kind: SelectionKind) -> &mut SelectionHistory {
        match kind {
            SelectionKind::Intervention => &mut self.interventions,
            SelectionKind::Problem => &mut self.problems,
        }
    }
}
