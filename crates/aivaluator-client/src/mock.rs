//! Mock scoring service for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use aivaluator_core::model::{Marks, QuestionScores, ScoreReport, SubmissionPayload};
use aivaluator_core::traits::ScoringService;

/// A scoring service that answers without a network round trip.
///
/// Either returns a fixed report, or derives one from the payload with a
/// caller-supplied marking function.
pub struct MockScoringService {
    fixed: Option<ScoreReport>,
    marker: fn(question: usize, student: usize) -> Marks,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last payload received.
    last_payload: Mutex<Option<SubmissionPayload>>,
}

impl MockScoringService {
    /// Score every answer with `marker(question_index, student_index)`.
    ///
    /// Report keys follow the payload: question text, then student name.
    pub fn new(marker: fn(usize, usize) -> Marks) -> Self {
        Self {
            fixed: None,
            marker,
            call_count: AtomicU32::new(0),
            last_payload: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same report.
    pub fn with_fixed_report(report: ScoreReport) -> Self {
        Self {
            fixed: Some(report),
            ..Self::new(|_, _| Marks {
                gpt: 0.0,
                textbook: 0.0,
            })
        }
    }

    /// Get the number of calls made to this service.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last payload submitted to this service.
    pub fn last_payload(&self) -> Option<SubmissionPayload> {
        self.last_payload
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ScoringService for MockScoringService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn score(&self, payload: &SubmissionPayload) -> anyhow::Result<ScoreReport> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_payload
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(payload.clone());

        if let Some(report) = &self.fixed {
            return Ok(report.clone());
        }

        let report = payload
            .questions
            .iter()
            .enumerate()
            .map(|(q, question)| {
                let scores: QuestionScores = payload
                    .students
                    .iter()
                    .enumerate()
                    .map(|(s, student)| (student.clone(), (self.marker)(q, s)))
                    .collect();
                (question.clone(), scores)
            })
            .collect();
        Ok(ScoreReport(report))
    }
}
