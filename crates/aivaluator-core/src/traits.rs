//! Trait seam between the controller and the scoring backend.
//!
//! Implemented by `aivaluator-client` for HTTP and mock backends.

use async_trait::async_trait;

use crate::model::{ScoreReport, SubmissionPayload};

/// A backend that grades a submission and returns per-question scores.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Grade a submission.
    async fn score(&self, payload: &SubmissionPayload) -> anyhow::Result<ScoreReport>;
}
