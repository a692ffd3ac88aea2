//! Core data model types for aivaluator.
//!
//! These are the wire and in-memory types shared by the controller, the
//! scoring client, and the renderer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PayloadError;

/// Student names in roster order; column order of the answer matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(pub Vec<String>);

/// A question together with the two reference answers it is graded against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text.
    pub text: String,
    /// GPT-generated reference answer.
    pub gpt_answer: String,
    /// Textbook reference answer.
    pub textbook_answer: String,
}

/// Student answers laid out as `[question][student]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMatrix(pub Vec<Vec<String>>);

/// The JSON body posted to the scoring service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub students: Vec<String>,
    pub questions: Vec<String>,
    /// Answers indexed `[question][student]`.
    pub answers: Vec<Vec<String>>,
    pub gpt_answers: Vec<String>,
    pub textbook_answers: Vec<String>,
}

impl SubmissionPayload {
    /// Assemble a payload from its structured parts.
    pub fn from_parts(roster: Roster, questions: Vec<Question>, answers: AnswerMatrix) -> Self {
        let mut payload = Self {
            students: roster.0,
            answers: answers.0,
            ..Default::default()
        };
        for q in questions {
            payload.questions.push(q.text);
            payload.gpt_answers.push(q.gpt_answer);
            payload.textbook_answers.push(q.textbook_answer);
        }
        payload
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Check that every per-question vector has one entry per question and
    /// every answer row has one entry per student.
    pub fn check_dimensions(&self) -> Result<(), PayloadError> {
        let expected = self.questions.len();
        for (list, found) in [
            ("GPT answers", self.gpt_answers.len()),
            ("textbook answers", self.textbook_answers.len()),
            ("answer rows", self.answers.len()),
        ] {
            if found != expected {
                return Err(PayloadError::LengthMismatch {
                    list,
                    expected,
                    found,
                });
            }
        }
        let students = self.students.len();
        for (i, row) in self.answers.iter().enumerate() {
            if row.len() != students {
                return Err(PayloadError::RaggedRow {
                    question: i + 1,
                    found: row.len(),
                    expected: students,
                });
            }
        }
        Ok(())
    }
}

/// Marks awarded to one student for one question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marks {
    /// Score against the GPT reference answer.
    #[serde(rename = "GPT")]
    pub gpt: f64,
    /// Score against the textbook reference answer.
    #[serde(rename = "TextBook")]
    pub textbook: f64,
}

/// Scores for every student under one question, in server order.
pub type QuestionScores = IndexMap<String, Marks>;

/// The scoring service response: question label → student name → marks.
///
/// Key order is preserved exactly as received so that rendering follows the
/// server's ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreReport(pub IndexMap<String, QuestionScores>);

impl ScoreReport {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn questions(&self) -> impl Iterator<Item = (&str, &QuestionScores)> {
        self.0.iter().map(|(q, s)| (q.as_str(), s))
    }

    /// Parse a report from its JSON wire form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> SubmissionPayload {
        SubmissionPayload::from_parts(
            Roster(vec!["Alice".into(), "Bob".into()]),
            vec![Question {
                text: "What is Rust?".into(),
                gpt_answer: "A systems language".into(),
                textbook_answer: "A language".into(),
            }],
            AnswerMatrix(vec![vec!["a1".into(), "b1".into()]]),
        )
    }

    #[test]
    fn payload_uses_wire_field_names() {
        let json = serde_json::to_value(sample_payload()).unwrap();
        assert_eq!(json["students"][1], "Bob");
        assert_eq!(json["questions"][0], "What is Rust?");
        assert_eq!(json["answers"][0][1], "b1");
        assert_eq!(json["gpt_answers"][0], "A systems language");
        assert_eq!(json["textbook_answers"][0], "A language");
    }

    #[test]
    fn check_dimensions_detects_short_row() {
        let mut payload = sample_payload();
        assert!(payload.check_dimensions().is_ok());

        payload.answers[0].pop();
        let err = payload.check_dimensions().unwrap_err();
        assert_eq!(
            err,
            PayloadError::RaggedRow {
                question: 1,
                found: 1,
                expected: 2
            }
        );
        assert_eq!(err.to_string(), "question 1 has 1 answers, expected 2");

        let mut payload = sample_payload();
        payload.textbook_answers.clear();
        assert!(matches!(
            payload.check_dimensions(),
            Err(PayloadError::LengthMismatch {
                list: "textbook answers",
                expected: 1,
                found: 0
            })
        ));
    }

    #[test]
    fn report_preserves_server_order() {
        let report = ScoreReport::from_json(
            r#"{"Zeta": {"Bob": {"GPT": 1, "TextBook": 2}},
                "Alpha": {"Zed": {"GPT": 3.5, "TextBook": 4}, "Amy": {"GPT": 5, "TextBook": 6}}}"#,
        )
        .unwrap();

        let labels: Vec<&str> = report.questions().map(|(q, _)| q).collect();
        assert_eq!(labels, vec!["Zeta", "Alpha"]);

        let students: Vec<&String> = report.0["Alpha"].keys().collect();
        assert_eq!(students, vec!["Zed", "Amy"]);
        assert_eq!(report.0["Alpha"]["Zed"].gpt, 3.5);
    }

    #[test]
    fn report_rejects_missing_marks() {
        let err = ScoreReport::from_json(r#"{"Q1": {"Alice": {"GPT": 1}}}"#);
        assert!(err.is_err());
    }
}
