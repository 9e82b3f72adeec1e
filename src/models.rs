//! Data models for the field report.
//!
//! This module contains the core data structures shared across the
//! application: selection events and their histories, the form field
//! snapshot, and the rows of the review table.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Label of the submission date row.
pub const LABEL_SUBMISSION_DATE: &str = "Date de Soumission";
/// Label of the current date/time row.
pub const LABEL_DATETIME: &str = "Date et Heure";
/// Label of the location row.
pub const LABEL_LOCATION: &str = "Localisation";
/// Label of the project/client row.
pub const LABEL_PROJECT: &str = "Projet/Client";
/// Label of the technician row.
pub const LABEL_TECHNICIAN: &str = "Technicien";
/// Label of the intervention type row.
pub const LABEL_INTERVENTION_TYPE: &str = "Type d'Intervention";
/// Label of the problem type row.
pub const LABEL_PROBLEM_TYPE: &str = "Nature du Problème";
/// Label of the status row.
pub const LABEL_STATUS: &str = "État";
/// Label of the intervention status row.
pub const LABEL_INTERVENTION_STATUS: &str = "Statut de l'intervention";
/// Label of the comments row.
pub const LABEL_COMMENTS: &str = "Commentaires";
/// Label of the intervention type history row.
pub const LABEL_INTERVENTION_HISTORY: &str = "Historique des Types d'Intervention";
/// Label of the problem type history row.
pub const LABEL_PROBLEM_HISTORY: &str = "Historique des Problèmes";

/// Display text of the problem select when nothing is chosen.
pub const PROBLEM_PLACEHOLDER: &str = "Sélectionnez le problème";
/// Display text of the intervention type select when nothing is chosen.
pub const INTERVENTION_PLACEHOLDER: &str = "Sélectionnez le type";

/// Values that mean "no answer" in the review table.
pub const DEFAULT_PLACEHOLDERS: &[&str] = &[
    "",
    "Sélectionnez un technicien",
    INTERVENTION_PLACEHOLDER,
    PROBLEM_PLACEHOLDER,
    "Sélectionnez le statut",
];

/// Which select a selection event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    /// Intervention type (electricity, home automation, ...).
    Intervention,
    /// Problem type, scoped to the chosen intervention type.
    Problem,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionKind::Intervention => write!(f, "intervention"),
            SelectionKind::Problem => write!(f, "problem"),
        }
    }
}

/// Error returned when a selection kind string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown selection kind: {0} (expected 'intervention' or 'problem')")]
pub struct UnknownSelectionKind(pub String);

impl FromStr for SelectionKind {
    type Err = UnknownSelectionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intervention" => Ok(SelectionKind::Intervention),
            "problem" => Ok(SelectionKind::Problem),
            other => Err(UnknownSelectionKind(other.to_string())),
        }
    }
}

/// One timestamped choice made in a select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    /// Option value (e.g. `pannes_de_courant`).
    pub value: String,
    /// Human-readable option text (e.g. `Pannes de courant`).
    pub display_text: String,
    /// When the choice was made.
    pub timestamp: DateTime<Local>,
}

impl SelectionEvent {
    /// Formats the event the way history rows show it: `text (HH:MM:SS)`.
    pub fn history_label(&self) -> String {
        format!("{} ({})", self.display_text, self.timestamp.format("%H:%M:%S"))
    }
}

/// Append-only log of selections for one select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionHistory {
    events: Vec<SelectionEvent>,
}

impl SelectionHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event, keeping timestamps non-decreasing.
    pub(crate) fn push(&mut self, mut event: SelectionEvent) {
        if let Some(last) = self.events.last() {
            if event.timestamp < last.timestamp {
                event.timestamp = last.timestamp;
            }
        }
        self.events.push(event);
    }

    /// Drops every event.
    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The most recent event, if any.
    pub fn last(&self) -> Option<&SelectionEvent> {
        self.events.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionEvent> {
        self.events.iter()
    }

    /// Summarizes every event except the most recent one.
    ///
    /// Returns `None` unless there are at least two events, since a single
    /// event is just the current value.
    pub fn earlier_changes(&self) -> Option<String> {
        if self.events.len() <= 1 {
            return None;
        }

        Some(
            self.iter()
                .take(self.len() - 1)
                .map(SelectionEvent::history_label)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Current values of the ten fixed form fields.
///
/// Select fields hold the display text of the chosen option, which is
/// the placeholder text when nothing is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(default)]
    pub submission_date: String,
    #[serde(default)]
    pub datetime: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub technician: String,
    #[serde(default)]
    pub intervention_type: String,
    #[serde(default)]
    pub problem_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub intervention_status: String,
    #[serde(default)]
    pub comments: String,
}

impl FormFields {
    /// The fixed rows in review-table order, before filtering.
    pub fn labeled(&self) -> [(&'static str, &str); 10] {
        [
            (LABEL_SUBMISSION_DATE, self.submission_date.as_str()),
            (LABEL_DATETIME, self.datetime.as_str()),
            (LABEL_LOCATION, self.location.as_str()),
            (LABEL_PROJECT, self.project.as_str()),
            (LABEL_TECHNICIAN, self.technician.as_str()),
            (LABEL_INTERVENTION_TYPE, self.intervention_type.as_str()),
            (LABEL_PROBLEM_TYPE, self.problem_type.as_str()),
            (LABEL_STATUS, self.status.as_str()),
            (LABEL_INTERVENTION_STATUS, self.intervention_status.as_str()),
            (LABEL_COMMENTS, self.comments.as_str()),
        ]
    }
}

/// A free-text form field that can be edited directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    SubmissionDate,
    Datetime,
    Location,
    Project,
    Technician,
    Status,
    InterventionStatus,
    Comments,
}

impl TextField {
    pub const ALL: [TextField; 8] = [
        TextField::SubmissionDate,
        TextField::Datetime,
        TextField::Location,
        TextField::Project,
        TextField::Technician,
        TextField::Status,
        TextField::InterventionStatus,
        TextField::Comments,
    ];

    /// Name used in session commands.
    pub fn name(&self) -> &'static str {
        match self {
            TextField::SubmissionDate => "submission_date",
            TextField::Datetime => "datetime",
            TextField::Location => "location",
            TextField::Project => "project",
            TextField::Technician => "technician",
            TextField::Status => "status",
            TextField::InterventionStatus => "intervention_status",
            TextField::Comments => "comments",
        }
    }

    /// Looks a field up by its command name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Mutable access to the field's value.
    pub fn slot<'a>(&self, fields: &'a mut FormFields) -> &'a mut String {
        match self {
            TextField::SubmissionDate => &mut fields.submission_date,
            TextField::Datetime => &mut fields.datetime,
            TextField::Location => &mut fields.location,
            TextField::Project => &mut fields.project,
            TextField::Technician => &mut fields.technician,
            TextField::Status => &mut fields.status,
            TextField::InterventionStatus => &mut fields.intervention_status,
            TextField::Comments => &mut fields.comments,
        }
    }
}

/// One label/value pair of the review table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

impl SummaryRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(text: &str, h: u32, m: u32, s: u32) -> SelectionEvent {
        SelectionEvent {
            value: text.to_lowercase().replace(' ', "_"),
            display_text: text.to_string(),
            timestamp: Local.with_ymd_and_hms(2026, 10, 19, h, m, s).unwrap(),
        }
    }

    #[test]
    fn test_selection_kind_from_str() {
        assert_eq!(
            "intervention".parse::<SelectionKind>(),
            Ok(SelectionKind::Intervention)
        );
        assert_eq!(" Problem ".parse::<SelectionKind>(), Ok(SelectionKind::Problem));
        assert!("status".parse::<SelectionKind>().is_err());
    }

    #[test]
    fn test_history_label_format() {
        let e = event("Pannes de courant", 9, 5, 7);
        assert_eq!(e.history_label(), "Pannes de courant (09:05:07)");
    }

    #[test]
    fn test_earlier_changes_needs_two_events() {
        let mut history = SelectionHistory::new();
        assert_eq!(history.earlier_changes(), None);

        history.push(event("Domotique", 10, 0, 0));
        assert_eq!(history.earlier_changes(), None);

        history.push(event("Sonorisation", 10, 1, 0));
        history.push(event("Autre", 10, 2, 0));
        assert_eq!(
            history.earlier_changes().as_deref(),
            Some("Domotique (10:00:00), Sonorisation (10:01:00)")
        );
    }

    #[test]
    fn test_push_clamps_out_of_order_timestamps() {
        let mut history = SelectionHistory::new();
        history.push(event("B", 11, 0, 0));
        history.push(event("A", 10, 0, 0));

        let stamps: Vec<_> = history.iter().map(|e| e.timestamp).collect();
        assert_eq!(stamps[0], stamps[1]);
        assert_eq!(history.last().map(|e| e.display_text.as_str()), Some("A"));
    }

    #[test]
    fn test_text_field_names_round_trip() {
        for field in TextField::ALL {
            assert_eq!(TextField::from_name(field.name()), Some(field));
        }
        assert_eq!(TextField::from_name("problem_type"), None);
    }

    #[test]
    fn test_labeled_order() {
        let fields = FormFields::default();
        let labels: Vec<_> = fields.labeled().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels.first(), Some(&LABEL_SUBMISSION_DATE));
        assert_eq!(labels.last(), Some(&LABEL_COMMENTS));
        assert_eq!(labels.len(), 10);
    }
}
