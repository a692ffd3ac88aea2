//! aivaluator-core: Form model, aggregation, and controller state machine.
//!
//! This crate defines the data model exchanged with the scoring service,
//! the form expansion/collection logic, per-student aggregation, and the
//! `Controller` that moves a page from its form view to its results view.

pub mod controller;
pub mod error;
pub mod form;
pub mod grades;
pub mod model;
pub mod session;
pub mod traits;

pub use controller::{Controller, FormState, ResultState, ViewState};
pub use error::{FormError, PayloadError, SubmitError};
pub use form::{FieldId, FieldValues, FormCounts, FormLayout, MAX_COUNT};
pub use grades::{aggregate, CombinedGrades, StudentAverage};
pub use model::{Marks, ScoreReport, SubmissionPayload};
pub use traits::ScoringService;
