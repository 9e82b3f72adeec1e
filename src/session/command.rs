//! Line commands for interactive form editing.

use crate::models::{SelectionKind, TextField};
use std::str::FromStr;
use thiserror::Error;

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `set <field> <value...>`; an empty value clears the field.
    Set { field: TextField, value: String },
    /// `intervention <value> [text...]` or `problem <value> [text...]`.
    Select {
        kind: SelectionKind,
        value: String,
        text: Option<String>,
    },
    Show,
    Export,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command: {0} (try 'help')")]
    Unknown(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),
}

/// Usage shown by `help`.
pub const COMMAND_HELP: &str = "\
Commands:
  set <field> <value>          update a field (submission_date, datetime, location,
                               project, technician, status, intervention_status, comments)
  intervention <value> [text]  choose the intervention type (empty value: '-')
  problem <value> [text]       choose the problem (empty value: '-')
  show                         print the review table now
  export                       send the report to the outbox
  quit                         leave";

/// Split off the first word, returning it and the trimmed remainder.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(char::is_whitespace) {
        Some(idx) => (&input[..idx], input[idx..].trim()),
        None => (input, ""),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (verb, rest) = split_word(line);
        let verb = verb.to_lowercase();

        match verb.as_str() {
            "" => Err(CommandError::Empty),
            "set" => {
                let (name, value) = split_word(rest);
                if name.is_empty() {
                    return Err(CommandError::MissingArgument("set"));
                }
                let field = TextField::from_name(name)
                    .ok_or_else(|| CommandError::UnknownField(name.to_string()))?;
                Ok(Command::Set {
                    field,
                    value: value.to_string(),
                })
            }
            "intervention" | "problem" => {
                let kind = if verb == "intervention" {
                    SelectionKind::Intervention
                } else {
                    SelectionKind::Problem
                };
                let (value, text) = split_word(rest);
                if value.is_empty() {
                    return Err(CommandError::MissingArgument(match kind {
                        SelectionKind::Intervention => "intervention",
                        SelectionKind::Problem => "problem",
                    }));
                }
                Ok(Command::Select {
                    kind,
                    value: if value == "-" { String::new() } else { value.to_string() },
                    text: (!text.is_empty()).then(|| text.to_string()),
                })
            }
            "show" => Ok(Command::Show),
            "export" => Ok(Command::Export),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
