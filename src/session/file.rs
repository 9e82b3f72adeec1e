//! Session files: a recorded form, replayed into a [`FormSession`].

use super::{format_datetime, format_location, FormSession};
use crate::models::{SelectionKind, TextField};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A select change recorded in a session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSelection {
    pub kind: SelectionKind,
    #[serde(default)]
    pub value: String,
    /// Option text; looked up in the catalog when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// When the choice was made; replay time when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<DateTime<Local>>,
}

/// On-disk form content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFile {
    #[serde(default)]
    pub submission_date: String,
    /// Filled with the replay time when absent.
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub technician: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub intervention_status: String,
    #[serde(default)]
    pub comments: String,
    /// Select changes, in the order they were made.
    #[serde(default)]
    pub selections: Vec<RecordedSelection>,
}

impl SessionFile {
    /// Load a session from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Replay the recorded form into `session`.
    pub fn apply(&self, session: &mut FormSession) {
        let datetime = self
            .datetime
            .clone()
            .unwrap_or_else(|| format_datetime(Local::now()));
        let location = format_location(&self.location, self.latitude, self.longitude);

        let values = [
            (TextField::SubmissionDate, self.submission_date.as_str()),
            (TextField::Datetime, datetime.as_str()),
            (TextField::Location, location.as_str()),
            (TextField::Project, self.project.as_str()),
            (TextField::Technician, self.technician.as_str()),
            (TextField::Status, self.status.as_str()),
            (TextField::InterventionStatus, self.intervention_status.as_str()),
            (TextField::Comments, self.comments.as_str()),
        ];
        for (field, value) in values {
            session.set_field(field, value);
        }

        for selection in &self.selections {
            let at = selection.at.unwrap_or_else(Local::now);
            debug!("Replaying {} selection '{}'", selection.kind, selection.value);
            session.select_at(
                selection.kind,
                &selection.value,
                selection.text.as_deref(),
                at,
            );
        }

        info!("Replayed session with {} selections", self.selections.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        LABEL_DATETIME, LABEL_INTERVENTION_HISTORY, LABEL_LOCATION, LABEL_PROBLEM_TYPE,
    };
    use std::io::Write;
    use tokio_test::{assert_err, assert_ok};

    const SESSION: &str = r#"{
        "submission_date": "2026-10-19",
        "datetime": "19/10/2026 09:30:00",
        "location": "12 Rue de la Paix, Paris",
        "latitude": 48.869,
        "longitude": 2.3315,
        "project": "Hôtel Vendôme",
        "technician": "Claire Dubois",
        "status": "En cours",
        "intervention_status": "Sélectionnez le statut",
        "selections": [
            {"kind": "intervention", "value": "videophone", "at": "2026-10-19T09:10:00+02:00"},
            {"kind": "intervention", "value": "domotique", "at": "2026-10-19T09:12:30+02:00"},
            {"kind": "problem", "value": "configuration_domotique", "at": "2026-10-19T09:13:00+02:00"}
        ]
    }"#;

    #[test]
    fn test_parse_and_apply() {
        let file = assert_ok!(SessionFile::parse(SESSION));
        assert_eq!(file.selections.len(), 3);

        let mut session = FormSession::default();
        file.apply(&mut session);
        let rows = session.snapshot();

        let value = |label: &str| {
            rows.iter()
                .find(|r| r.label == label)
                .map(|r| r.value.clone())
        };
        assert_eq!(value(LABEL_DATETIME).as_deref(), Some("19/10/2026 09:30:00"));
        assert_eq!(
            value(LABEL_LOCATION).as_deref(),
            Some("12 Rue de la Paix, Paris (Latitude: 48.869000, Longitude: 2.331500)")
        );
        assert_eq!(value(LABEL_PROBLEM_TYPE).as_deref(), Some("Configuration Domotique"));
        assert!(value(LABEL_INTERVENTION_HISTORY)
            .is_some_and(|v| v.starts_with("Vidéophone (")));
        assert_eq!(rows.len(), 9);
    }

    #[test]
    fn test_missing_datetime_is_filled() {
        let file = assert_ok!(SessionFile::parse("{}"));
        let mut session = FormSession::default();
        file.apply(&mut session);

        assert!(!session.fields().datetime.is_empty());
        assert_eq!(session.snapshot().len(), 1);
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let content = r#"{"selections": [{"kind": "status", "value": "x"}]}"#;
        assert_err!(SessionFile::parse(content));
    }

    #[test]
    fn test_fixture_session() {
        let file = assert_ok!(SessionFile::parse(include_str!(
            "../../fixtures/intervention.json"
        )));
        let mut session = FormSession::default();
        file.apply(&mut session);

        let rows = session.snapshot();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows[6].value, "Prises défectueuses");

        // Timestamps are shown in the local zone of the machine running the test.
        let at = file.selections[2].at.unwrap();
        assert_eq!(
            rows[11].value,
            format!("Pannes de courant ({})", at.format("%H:%M:%S"))
        );
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SESSION.as_bytes()).unwrap();

        let loaded = assert_ok!(SessionFile::load(file.path()));
        assert_eq!(loaded.technician, "Claire Dubois");
        assert!(SessionFile::load(Path::new("does/not/exist.json")).is_err());
    }
}
