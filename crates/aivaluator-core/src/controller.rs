//! The form-and-result controller.
//!
//! The page is modelled as a one-way state machine: a [`ViewState::Form`]
//! that is expanded, filled in, and submitted, followed by a
//! [`ViewState::Result`] once the scoring service answers. Renderers only
//! ever see the current `ViewState`.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{FormError, SubmitError};
use crate::form::{FieldId, FieldValues, FormCounts, FormLayout};
use crate::grades::{aggregate, CombinedGrades, StudentAverage};
use crate::model::{ScoreReport, SubmissionPayload};
use crate::traits::ScoringService;

/// A submission awaiting its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingSubmission {
    /// Question count of the payload that was sent; averages divide by it.
    pub question_count: usize,
}

/// Form view: count inputs, the generated fields, and their values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    /// `None` until Start has been pressed.
    pub layout: Option<FormLayout>,
    pub values: FieldValues,
    pub pending: Option<PendingSubmission>,
    /// Visible, dismissible error banner.
    pub error: Option<String>,
}

impl FormState {
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn counts(&self) -> Option<FormCounts> {
        self.layout.as_ref().map(|l| l.counts)
    }

    /// Empty required fields of the current layout.
    pub fn missing_fields(&self) -> Vec<FieldId> {
        self.layout
            .as_ref()
            .map(|l| l.missing_fields(&self.values))
            .unwrap_or_default()
    }
}

/// Results view: the server's report plus per-student sums.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultState {
    pub report: ScoreReport,
    pub combined: CombinedGrades,
    pub question_count: usize,
}

impl ResultState {
    pub fn new(report: ScoreReport, question_count: usize) -> Self {
        let combined = aggregate(&report);
        Self {
            report,
            combined,
            question_count,
        }
    }

    /// Per-student averages, or `None` when no questions were asked.
    pub fn averages(&self) -> Option<Vec<StudentAverage>> {
        self.combined.averages(self.question_count)
    }
}

/// Everything a renderer needs to draw the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewState {
    Form(FormState),
    Result(ResultState),
}

/// Drives the page through its Form → Result lifecycle.
#[derive(Debug, Clone)]
pub struct Controller {
    state: ViewState,
    require_all_fields: bool,
}

impl Default for Controller {
    fn default() -> Self {
        Self::initialize()
    }
}

impl Controller {
    /// Start with the bare form shell: no counts, no fields.
    pub fn initialize() -> Self {
        Self {
            state: ViewState::Form(FormState::default()),
            require_all_fields: true,
        }
    }

    /// Whether empty fields block submission (on by default).
    pub fn with_required_fields(mut self, required: bool) -> Self {
        self.require_all_fields = required;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn into_state(self) -> ViewState {
        self.state
    }

    fn form_mut(&mut self) -> Result<&mut FormState, FormError> {
        match &mut self.state {
            ViewState::Form(form) => Ok(form),
            ViewState::Result(_) => Err(FormError::Closed),
        }
    }

    /// Generate the student and question fields for `counts`.
    ///
    /// Replaces any previous layout. Values of fields that still exist are
    /// kept; the rest are dropped. Counts above [`MAX_COUNT`] are rejected.
    ///
    /// [`MAX_COUNT`]: crate::form::MAX_COUNT
    pub fn expand(&mut self, counts: FormCounts) -> Result<&FormLayout, FormError> {
        let form = self.form_mut()?;
        let counts = FormCounts::new(counts.students, counts.questions)?;
        let layout = FormLayout::expand(counts);
        form.values.retain_in(&layout);
        form.error = None;
        debug!(
            students = counts.students,
            questions = counts.questions,
            fields = layout.field_count(),
            "expanded form"
        );
        Ok(form.layout.insert(layout))
    }

    /// Expand from the raw text of the two count inputs.
    ///
    /// Invalid counts are reported both as the return value and on the
    /// form's error banner.
    pub fn expand_from_input(
        &mut self,
        students: &str,
        questions: &str,
    ) -> Result<&FormLayout, FormError> {
        match FormCounts::parse(students, questions) {
            Ok(counts) => self.expand(counts),
            Err(e) => {
                self.form_mut()?.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Set the value of one generated field.
    pub fn set_field(&mut self, id: FieldId, value: impl Into<String>) -> Result<(), FormError> {
        let form = self.form_mut()?;
        let layout = form.layout.as_ref().ok_or(FormError::NotExpanded)?;
        if !layout.contains(id) {
            return Err(FormError::FieldOutOfRange(id));
        }
        form.values.set(id, value);
        Ok(())
    }

    /// Set a field addressed by its element id (e.g. `answer0_1`).
    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        self.set_field(name.parse()?, value)
    }

    /// Read all field values into a payload.
    pub fn collect(&self) -> Result<SubmissionPayload, FormError> {
        match &self.state {
            ViewState::Form(form) => form
                .layout
                .as_ref()
                .map(|l| l.collect(&form.values))
                .ok_or(FormError::NotExpanded),
            ViewState::Result(_) => Err(FormError::Closed),
        }
    }

    /// Validate and collect the form, and mark it as in flight.
    ///
    /// Only one submission may be in flight at a time.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SubmitError> {
        let require_all_fields = self.require_all_fields;
        let form = match &mut self.state {
            ViewState::Form(form) => form,
            ViewState::Result(_) => return Err(SubmitError::AlreadyGraded),
        };
        if form.is_submitting() {
            warn!("ignoring duplicate submission");
            return Err(SubmitError::AlreadySubmitting);
        }
        let layout = form.layout.as_ref().ok_or(FormError::NotExpanded)?;

        if require_all_fields {
            let missing = layout.missing_fields(&form.values);
            if !missing.is_empty() {
                let err = SubmitError::MissingFields(missing);
                form.error = Some(err.to_string());
                return Err(err);
            }
        }

        let payload = layout.collect(&form.values);
        form.pending = Some(PendingSubmission {
            question_count: payload.question_count(),
        });
        form.error = None;
        info!(
            students = payload.student_count(),
            questions = payload.question_count(),
            "submitting answers"
        );
        Ok(payload)
    }

    /// Accept the scoring response and switch to the results view.
    pub fn complete_submit(&mut self, report: ScoreReport) -> Result<&ResultState, SubmitError> {
        let pending = match &self.state {
            ViewState::Form(form) => form.pending.ok_or(SubmitError::NotSubmitting)?,
            ViewState::Result(_) => return Err(SubmitError::AlreadyGraded),
        };
        info!(questions = report.len(), "received graded results");
        self.state = ViewState::Result(ResultState::new(report, pending.question_count));
        match &self.state {
            ViewState::Result(result) => Ok(result),
            ViewState::Form(_) => Err(SubmitError::NotSubmitting),
        }
    }

    /// Record a failed submission; the form becomes submittable again.
    pub fn fail_submit(&mut self, error: impl std::fmt::Display) {
        if let ViewState::Form(form) = &mut self.state {
            warn!(%error, "submission failed");
            form.pending = None;
            form.error = Some(error.to_string());
        }
    }

    pub fn dismiss_error(&mut self) {
        if let ViewState::Form(form) = &mut self.state {
            form.error = None;
        }
    }

    /// Run a full submission round trip against `service`.
    pub async fn submit_with(
        &mut self,
        service: &dyn ScoringService,
    ) -> Result<&ResultState, SubmitError> {
        let payload = self.begin_submit()?;
        match service.score(&payload).await {
            Ok(report) => self.complete_submit(report),
            Err(e) => {
                let message = format!("{e:#}");
                self.fail_submit(&message);
                Err(SubmitError::Service(message))
            }
        }
    }
}
