//! Per-student aggregation of score reports.
//!
//! Sums each student's GPT and TextBook marks across every question in a
//! [`ScoreReport`] and turns the sums into averages over the question count.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::ScoreReport;

/// Running totals for one student.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeSum {
    pub gpt: f64,
    pub textbook: f64,
}

/// Averaged marks for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAverage {
    pub student: String,
    pub gpt: f64,
    pub textbook: f64,
}

/// Per-student sums, in the order students first appear in the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinedGrades(IndexMap<String, GradeSum>);

impl CombinedGrades {
    pub fn get(&self, student: &str) -> Option<&GradeSum> {
        self.0.get(student)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GradeSum)> {
        self.0.iter().map(|(s, g)| (s.as_str(), g))
    }

    /// Divide every sum by `question_count`.
    ///
    /// Returns `None` when `question_count` is zero.
    pub fn averages(&self, question_count: usize) -> Option<Vec<StudentAverage>> {
        if question_count == 0 {
            return None;
        }
        let n = question_count as f64;
        Some(
            self.0
                .iter()
                .map(|(student, sum)| StudentAverage {
                    student: student.clone(),
                    gpt: sum.gpt / n,
                    textbook: sum.textbook / n,
                })
                .collect(),
        )
    }
}

/// Sum GPT and TextBook marks per student across all questions.
pub fn aggregate(report: &ScoreReport) -> CombinedGrades {
    let mut combined: IndexMap<String, GradeSum> = IndexMap::new();
    for (_, scores) in report.questions() {
        for (student, marks) in scores {
            let entry = combined.entry(student.clone()).or_default();
            entry.gpt += marks.gpt;
            entry.textbook += marks.textbook;
        }
    }
    CombinedGrades(combined)
}
