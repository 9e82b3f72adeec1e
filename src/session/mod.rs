//! Form sessions.
//!
//! A session owns the current field values and the summary engine, and
//! applies form edits to both: the job the form page does around the engine.

pub mod command;
pub mod file;

pub use command::*;
pub use file::*;

use crate::catalog;
use crate::models::{
    FormFields, SelectionKind, SummaryRow, TextField, INTERVENTION_PLACEHOLDER,
    PROBLEM_PLACEHOLDER,
};
use crate::summary::SummaryEngine;
use chrono::{DateTime, Local};
use tracing::debug;

/// Format used for the "Date et Heure" field.
pub const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Current local time as shown in the form.
pub fn format_datetime(at: DateTime<Local>) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Location text with coordinates appended when known.
pub fn format_location(text: &str, latitude: Option<f64>, longitude: Option<f64>) -> String {
    let coords = match (latitude, longitude) {
        (Some(lat), Some(lon)) => format!("Latitude: {:.6}, Longitude: {:.6}", lat, lon),
        _ => return text.trim().to_string(),
    };

    let text = text.trim();
    if text.is_empty() {
        coords
    } else {
        format!("{} ({})", text, coords)
    }
}

/// Field values plus selection history for one report in progress.
#[derive(Debug, Clone)]
pub struct FormSession {
    engine: SummaryEngine,
    fields: FormFields,
}

impl FormSession {
    pub fn new(engine: SummaryEngine) -> Self {
        Self {
            engine,
            fields: FormFields {
                intervention_type: INTERVENTION_PLACEHOLDER.to_string(),
                problem_type: PROBLEM_PLACEHOLDER.to_string(),
                ..Default::default()
            },
        }
    }

    #[cfg(test)]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    #[cfg(test)]
    pub fn engine(&self) -> &SummaryEngine {
        &self.engine
    }

    pub fn set_field(&mut self, field: TextField, value: &str) {
        *field.slot(&mut self.fields) = value.to_string();
        debug!("Field {} updated", field.name());
    }

    /// Apply a select change made now.
    pub fn select(&mut self, kind: SelectionKind, value: &str, text: Option<&str>) {
        let value = value.trim();
        let display = self.show_selection(kind, value, text);
        self.engine.record_selection(kind, value, &display);
    }

    /// Apply a select change made at `at`.
    pub fn select_at(
        &mut self,
        kind: SelectionKind,
        value: &str,
        text: Option<&str>,
        at: DateTime<Local>,
    ) {
        let value = value.trim();
        let display = self.show_selection(kind, value, text);
        self.engine.record_selection_at(kind, value, &display, at);
    }

    /// Put the chosen option's text in its select and return it.
    ///
    /// Changing the intervention type empties the problem select, since
    /// problems are offered per intervention type.
    fn show_selection(&mut self, kind: SelectionKind, value: &str, text: Option<&str>) -> String {
        let display = self.display_text(kind, value, text);

        match kind {
            SelectionKind::Intervention => {
                self.fields.intervention_type = display.clone();
                self.fields.problem_type = PROBLEM_PLACEHOLDER.to_string();
            }
            SelectionKind::Problem => {
                self.fields.problem_type = display.clone();
            }
        }

        display
    }

    fn display_text(&self, kind: SelectionKind, value: &str, text: Option<&str>) -> String {
        if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
            return text.to_string();
        }

        if value.is_empty() {
            return match kind {
                SelectionKind::Intervention => INTERVENTION_PLACEHOLDER,
                SelectionKind::Problem => PROBLEM_PLACEHOLDER,
            }
            .to_string();
        }

        match kind {
            SelectionKind::Intervention => catalog::intervention_type(value)
                .map(|t| t.label.to_string())
                .unwrap_or_else(|| value.to_string()),
            SelectionKind::Problem => self
                .current_intervention()
                .and_then(|t| t.find_problem(value))
                .map(|p| p.label)
                .or_else(|| catalog::problem_label(value))
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        }
    }

    fn current_intervention(&self) -> Option<&'static catalog::InterventionType> {
        let value = &self.engine.history(SelectionKind::Intervention).last()?.value;
        catalog::intervention_type(value)
    }

    pub fn snapshot(&self) -> Vec<SummaryRow> {
        self.engine.build_snapshot(&self.fields)
    }

    pub fn reset_histories(&mut self) {
        self.engine.reset_histories();
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new(SummaryEngine::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LABEL_INTERVENTION_TYPE, LABEL_PROBLEM_HISTORY, LABEL_PROBLEM_TYPE};
    use chrono::TimeZone;

    #[test]
    fn test_new_session_is_empty() {
        let session = FormSession::default();
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn test_intervention_change_clears_problem() {
        let mut session = FormSession::default();
        session.select(SelectionKind::Intervention, "electricite", None);
        session.select(SelectionKind::Problem, "pannes_de_courant", None);
        assert_eq!(session.fields().problem_type, "Pannes de courant");

        session.select(SelectionKind::Intervention, "domotique", None);
        assert_eq!(session.fields().intervention_type, "Domotique");
        assert_eq!(session.fields().problem_type, PROBLEM_PLACEHOLDER);

        let labels: Vec<_> = session.snapshot().into_iter().map(|r| r.label).collect();
        assert!(labels.contains(&LABEL_INTERVENTION_TYPE.to_string()));
        assert!(!labels.contains(&LABEL_PROBLEM_TYPE.to_string()));
    }

    #[test]
    fn test_empty_selection_shows_placeholder_and_records_nothing() {
        let mut session = FormSession::default();
        session.select(SelectionKind::Intervention, "autre", None);
        session.select(SelectionKind::Intervention, "", None);

        assert_eq!(session.fields().intervention_type, INTERVENTION_PLACEHOLDER);
        assert_eq!(
            session.engine().history(SelectionKind::Intervention).len(),
            1
        );
    }

    #[test]
    fn test_problem_history_from_selects() {
        let mut session = FormSession::default();
        let at = |m| Local.with_ymd_and_hms(2026, 10, 19, 16, m, 0).unwrap();
        session.select_at(SelectionKind::Intervention, "electricite", None, at(0));
        session.select_at(SelectionKind::Problem, "pannes_de_courant", None, at(1));
        session.select_at(SelectionKind::Problem, "prises_défectueuses", None, at(2));

        let rows = session.snapshot();
        let history = rows.iter().find(|r| r.label == LABEL_PROBLEM_HISTORY).unwrap();
        assert_eq!(history.value, "Pannes de courant (16:01:00)");
        assert_eq!(session.fields().problem_type, "Prises défectueuses");
    }

    #[test]
    fn test_accent_free_problem_value_shows_catalog_text() {
        let mut session = FormSession::default();
        session.select(SelectionKind::Intervention, "electricite", None);
        session.select(SelectionKind::Problem, "pannes_de_courant", None);
        session.select(SelectionKind::Problem, "prises_defectueuses", None);

        assert_eq!(session.fields().problem_type, "Prises défectueuses");

        let rows = session.snapshot();
        let problem = rows.iter().find(|r| r.label == LABEL_PROBLEM_TYPE).unwrap();
        assert_eq!(problem.value, "Prises défectueuses");
        let history = rows.iter().find(|r| r.label == LABEL_PROBLEM_HISTORY).unwrap();
        assert!(history.value.starts_with("Pannes de courant ("));
        assert_eq!(session.engine().history(SelectionKind::Problem).len(), 2);
    }

    #[test]
    fn test_unknown_values_fall_back_to_value() {
        let mut session = FormSession::default();
        session.select(SelectionKind::Intervention, "plomberie", None);
        session.select(SelectionKind::Problem, "fuite", Some("Fuite d'eau"));

        assert_eq!(session.fields().intervention_type, "plomberie");
        assert_eq!(session.fields().problem_type, "Fuite d'eau");
    }

    #[test]
    fn test_format_location() {
        assert_eq!(format_location(" Lyon ", None, None), "Lyon");
        assert_eq!(
            format_location("", Some(45.764043), Some(4.835659)),
            "Latitude: 45.764043, Longitude: 4.835659"
        );
        assert_eq!(
            format_location("Lyon", Some(45.0), Some(4.5)),
            "Lyon (Latitude: 45.000000, Longitude: 4.500000)"
        );
    }

    #[test]
    fn test_format_datetime() {
        let at = Local.with_ymd_and_hms(2026, 3, 4, 7, 8, 9).unwrap();
        assert_eq!(format_datetime(at), "04/03/2026 07:08:09");
    }
}
