//! Intervention types and the problems offered for each.

use crate::summary::fold;

/// An intervention type option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterventionType {
    /// Option value, also the catalog key.
    pub value: &'static str,
    /// Text shown to the technician.
    pub label: &'static str,
    problems: &'static [&'static str],
}

/// A problem option, as offered once an intervention type is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemOption {
    pub value: String,
    pub label: &'static str,
}

/// Extra problem only offered for home automation.
const HOME_AUTOMATION_EXTRA: &str = "Configuration Domotique";

pub const INTERVENTION_TYPES: &[InterventionType] = &[
    InterventionType {
        value: "electricite",
        label: "Électricité",
        problems: &[
            "Pannes de courant",
            "Problèmes de câblage",
            "Prises défectueuses",
            "Éclairage défaillant",
            "Autre",
        ],
    },
    InterventionType {
        value: "domotique",
        label: "Domotique",
        problems: &[
            "Problèmes de connectivité",
            "Bugs logiciels",
            "Erreurs de configuration",
            "Mises à jour manquantes",
            "Incompatibilité des appareils",
            "Configuration point d'accès",
            "Autre",
        ],
    },
    InterventionType {
        value: "climatisation/chauffage",
        label: "Climatisation/Chauffage",
        problems: &[
            "Insuffisance de refroidissement",
            "Problèmes de thermostat",
            "Bruits inhabituels",
            "Autre",
        ],
    },
    InterventionType {
        value: "sonorisation",
        label: "Sonorisation",
        problems: &[
            "Problèmes de connectivité",
            "Qualité sonore dégradée",
            "Défaillance des amplificateurs",
            "Pannes des haut-parleurs",
            "Autre",
        ],
    },
    InterventionType {
        value: "videophone",
        label: "Vidéophone",
        problems: &[
            "Problèmes de connexion réseau",
            "Problèmes d'alimentation",
            "Qualité vidéo ou audio dégradée",
            "Bouton d'appel défectueux",
            "Problèmes de synchronisation",
            "Installation",
            "Configuration",
            "Autre",
        ],
    },
    InterventionType {
        value: "supervision",
        label: "Supervision",
        problems: &[
            "Problèmes de connectivité",
            "Erreurs système",
            "Problèmes d'affichage",
            "Erreurs de données",
            "Autre",
        ],
    },
    InterventionType {
        value: "autre",
        label: "Autre",
        problems: &["Autre"],
    },
];

/// Find an intervention type by option value.
pub fn intervention_type(value: &str) -> Option<&'static InterventionType> {
    INTERVENTION_TYPES.iter().find(|t| t.value == value)
}

/// Option value of a problem: lowercase, whitespace runs replaced by `_`.
pub fn problem_value(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

impl InterventionType {
    /// Problems offered for this intervention type, in display order.
    pub fn problems(&self) -> Vec<ProblemOption> {
        let extra = (self.value == "domotique").then_some(HOME_AUTOMATION_EXTRA);

        self.problems
            .iter()
            .copied()
            .chain(extra)
            .map(|label| ProblemOption {
                value: problem_value(label),
                label,
            })
            .collect()
    }

    /// Find one of this type's problems by option value or label, ignoring
    /// case and accents.
    pub fn find_problem(&self, query: &str) -> Option<ProblemOption> {
        let query = fold(query);
        self.problems()
            .into_iter()
            .find(|p| fold(&p.value) == query || fold(p.label) == query)
    }
}

/// Find a problem label across every intervention type.
pub fn problem_label(query: &str) -> Option<&'static str> {
    INTERVENTION_TYPES
        .iter()
        .find_map(|t| t.find_problem(query))
        .map(|p| p.label)
}
