//! Form and submission error types.
//!
//! These cover failures the controller can detect on its own, before or
//! around a scoring request. Transport failures live in `aivaluator-client`.

use thiserror::Error;

use crate::form::FieldId;

/// Errors raised while building or reading the generated form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A count entry was not an integer in `0..=max`.
    #[error("invalid {field} count: '{value}' is not an integer between 0 and {max}")]
    InvalidCount {
        field: &'static str,
        value: String,
        max: usize,
    },

    /// A field id string did not match any generated field shape.
    #[error("unknown field id: {0}")]
    UnknownField(String),

    /// A field id refers to an index outside the current layout.
    #[error("field {0} is not part of the current form")]
    FieldOutOfRange(FieldId),

    /// Collect was called before the form was expanded.
    #[error("form has not been expanded yet")]
    NotExpanded,

    /// The form was replaced by the results view.
    #[error("form is closed; results are displayed")]
    Closed,
}

/// Errors raised by the submission step of the controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// The form could not be collected.
    #[error(transparent)]
    Form(#[from] FormError),

    /// Required fields are empty.
    #[error("{} required field(s) are empty: {}", .0.len(), join_fields(.0))]
    MissingFields(Vec<FieldId>),

    /// A submission is already awaiting a response.
    #[error("a submission is already in flight")]
    AlreadySubmitting,

    /// The controller is showing results and no longer accepts submissions.
    #[error("results are already displayed")]
    AlreadyGraded,

    /// A response arrived with no submission in flight.
    #[error("no submission is in flight")]
    NotSubmitting,

    /// The scoring service call failed.
    #[error("scoring request failed: {0}")]
    Service(String),
}

/// Shape errors in a [`SubmissionPayload`](crate::model::SubmissionPayload).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// A per-question list does not have one entry per question.
    #[error("expected {expected} {list}, found {found}")]
    LengthMismatch {
        list: &'static str,
        expected: usize,
        found: usize,
    },

    /// An answer row does not have one entry per student.
    #[error("question {question} has {found} answers, expected {expected}")]
    RaggedRow {
        question: usize,
        found: usize,
        expected: usize,
    },
}

fn join_fields(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
