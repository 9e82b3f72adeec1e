//! Payload keys derived from review-table labels.

use crate::models::SummaryRow;
use serde_json::{Map, Value};
use unicode_normalization::UnicodeNormalization;

/// Turn a row label into a storage key.
///
/// Lowercases, replaces each whitespace run with `_`, drops parentheses,
/// strips combining diacritics and maps apostrophes and slashes to `_`.
pub fn clean_key(label: &str) -> String {
    let lowered = label.to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push('_');
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    let stripped: String = collapsed.chars().filter(|c| *c != '(' && *c != ')').collect();

    strip_diacritics(&stripped)
        .chars()
        .map(|c| match c {
            '\'' | '/' => '_',
            other => other,
        })
        .collect()
}

/// Drop combining diacritics after NFD decomposition (`é` → `e`).
fn strip_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect()
}

/// Case- and accent-insensitive form of `text`, for matching option values.
pub fn fold(text: &str) -> String {
    strip_diacritics(&text.trim().to_lowercase())
}

/// Build the key/value object sent to a backend. Later rows win when two
/// labels clean to the same key.
pub fn build_payload(rows: &[SummaryRow]) -> Map<String, Value> {
    let mut payload = Map::new();
    for row in rows {
        payload.insert(clean_key(&row.label), Value::String(row.value.clone()));
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;

    #[test]
    fn test_clean_key_fixed_labels() {
        let cases = [
            (LABEL_SUBMISSION_DATE, "date_de_soumission"),
            (LABEL_DATETIME, "date_et_heure"),
            (LABEL_LOCATION, "localisation"),
            (LABEL_PROJECT, "projet_client"),
            (LABEL_TECHNICIAN, "technicien"),
            (LABEL_INTERVENTION_TYPE, "type_d_intervention"),
            (LABEL_PROBLEM_TYPE, "nature_du_probleme"),
            (LABEL_STATUS, "etat"),
            (LABEL_INTERVENTION_STATUS, "statut_de_l_intervention"),
            (LABEL_COMMENTS, "commentaires"),
            (LABEL_INTERVENTION_HISTORY, "historique_des_types_d_intervention"),
            (LABEL_PROBLEM_HISTORY, "historique_des_problemes"),
        ];

        for (label, expected) in cases {
            assert_eq!(clean_key(label), expected, "label {label:?}");
        }
    }

    #[test]
    fn test_clean_key_edge_cases() {
        assert_eq!(clean_key("Durée  (minutes)"), "duree_minutes");
        assert_eq!(clean_key(" Zone\tA "), "_zone_a_");
        assert_eq!(clean_key("Ça/Là"), "ca_la");
        assert_eq!(clean_key(""), "");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold(" Prises DÉFECTUEUSES "), "prises defectueuses");
        assert_eq!(fold("prises_défectueuses"), fold("prises_defectueuses"));
        assert_eq!(fold("Ça"), "ca");
    }

    #[test]
    fn test_build_payload() {
        let rows = vec![
            SummaryRow::new(LABEL_TECHNICIAN, "Jean Martin"),
            SummaryRow::new(LABEL_STATUS, "Terminé"),
        ];

        let payload = build_payload(&rows);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload["technicien"], "Jean Martin");
        assert_eq!(payload["etat"], "Terminé");
    }

    #[test]
    fn test_build_payload_last_row_wins() {
        let rows = vec![
            SummaryRow::new("Projet Client", "A"),
            SummaryRow::new("Projet/Client", "B"),
        ];

        let payload = build_payload(&rows);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload["projet_client"], "B");
    }
}
