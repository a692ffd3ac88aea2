//! Session files: a TOML snapshot of the form's field values.
//!
//! ```toml
//! students = 2
//! questions = 1
//!
//! [values]
//! student0 = "Alice"
//! question0 = "What is ownership?"
//! answer0_0 = "..."
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::controller::Controller;
use crate::error::FormError;
use crate::form::{FieldId, FieldValues, FormCounts, FormLayout};

#[derive(Debug, Deserialize, Serialize)]
struct TomlSession {
    students: usize,
    questions: usize,
    #[serde(default)]
    values: IndexMap<String, String>,
}

/// Declared counts plus the values typed into the generated fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub counts: FormCounts,
    pub values: FieldValues,
}

impl Session {
    /// A session with every field of `counts` present and empty.
    pub fn skeleton(counts: FormCounts) -> Self {
        let values = FormLayout::expand(counts)
            .fields()
            .map(|f| (f.id, String::new()))
            .collect();
        Self { counts, values }
    }

    /// Serialize back to the TOML session format.
    pub fn to_toml_string(&self) -> Result<String> {
        let raw = TomlSession {
            students: self.counts.students,
            questions: self.counts.questions,
            values: self
                .values
                .iter()
                .map(|(id, v)| (id.to_string(), v.to_string()))
                .collect(),
        };
        toml::to_string(&raw).context("failed to serialize session")
    }

    /// Build a controller with the form expanded and all values applied.
    ///
    /// Values for fields outside the declared counts are skipped; see
    /// [`validate_session`] to report them.
    pub fn into_controller(self) -> Result<Controller, FormError> {
        let mut controller = Controller::initialize();
        controller.expand(self.counts)?;
        for (id, value) in self.values.iter() {
            match controller.set_field(id, value) {
                Ok(()) => {}
                Err(FormError::FieldOutOfRange(id)) => {
                    debug!(field = %id, "skipping value outside the declared counts");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(controller)
    }
}

/// Load a session file from disk.
pub fn load_session(path: &Path) -> Result<Session> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read session file: {}", path.display()))?;
    parse_session_str(&content, path)
}

/// Parse a TOML session string (useful for testing).
pub fn parse_session_str(content: &str, source_path: &Path) -> Result<Session> {
    let parsed: TomlSession = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let values = parsed
        .values
        .into_iter()
        .map(|(key, value)| {
            let id: FieldId = key
                .parse()
                .with_context(|| format!("invalid key in [values]: {key}"))?;
            Ok((id, value))
        })
        .collect::<Result<FieldValues>>()?;

    let counts = FormCounts::new(parsed.students, parsed.questions)
        .with_context(|| format!("invalid counts in {}", source_path.display()))?;

    Ok(Session { counts, values })
}

/// A warning from session validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The field concerned (if applicable).
    pub field: Option<FieldId>,
    /// Warning message.
    pub message: String,
}

/// Validate a session for empty fields and stray values.
pub fn validate_session(session: &Session) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let layout = FormLayout::expand(session.counts);

    for id in layout.missing_fields(&session.values) {
        warnings.push(ValidationWarning {
            field: Some(id),
            message: "value is empty".into(),
        });
    }

    for (id, _) in session.values.iter() {
        if !layout.contains(id) {
            warnings.push(ValidationWarning {
                field: Some(id),
                message: format!(
                    "field is outside the declared {} students x {} questions and will be ignored",
                    session.counts.students, session.counts.questions
                ),
            });
        }
    }

    // Duplicate names collapse into one entry in the scored report.
    let mut seen = std::collections::HashSet::new();
    for field in &layout.students {
        if let Some(name) = session.values.get(field.id) {
            if !name.trim().is_empty() && !seen.insert(name.trim()) {
                warnings.push(ValidationWarning {
                    field: Some(field.id),
                    message: format!("duplicate student name: {}", name.trim()),
                });
            }
        }
    }

    warnings
}
