//! Form expansion and collection.
//!
//! `FormLayout::expand` generates the input fields for a given number of
//! students and questions; `collect` reads their values back into a
//! [`SubmissionPayload`] in generation order.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::model::{AnswerMatrix, Question, Roster, SubmissionPayload};

/// Identifier of a single generated input.
///
/// The `Display` form is the element id used in the rendered page
/// (`student0`, `gptAnswer1`, `answer1_0`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    Student(usize),
    Question(usize),
    GptAnswer(usize),
    TextbookAnswer(usize),
    /// Answer of student `.1` to question `.0`.
    Answer(usize, usize),
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Student(i) => write!(f, "student{i}"),
            FieldId::Question(i) => write!(f, "question{i}"),
            FieldId::GptAnswer(i) => write!(f, "gptAnswer{i}"),
            FieldId::TextbookAnswer(i) => write!(f, "textbookAnswer{i}"),
            FieldId::Answer(q, s) => write!(f, "answer{q}_{s}"),
        }
    }
}

impl FromStr for FieldId {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || FormError::UnknownField(s.to_string());
        let index = |rest: &str| rest.parse::<usize>().map_err(|_| unknown());

        if let Some(rest) = s.strip_prefix("student") {
            Ok(FieldId::Student(index(rest)?))
        } else if let Some(rest) = s.strip_prefix("question") {
            Ok(FieldId::Question(index(rest)?))
        } else if let Some(rest) = s.strip_prefix("gptAnswer") {
            Ok(FieldId::GptAnswer(index(rest)?))
        } else if let Some(rest) = s.strip_prefix("textbookAnswer") {
            Ok(FieldId::TextbookAnswer(index(rest)?))
        } else if let Some(rest) = s.strip_prefix("answer") {
            let (q, st) = rest.split_once('_').ok_or_else(unknown)?;
            Ok(FieldId::Answer(index(q)?, index(st)?))
        } else {
            Err(unknown())
        }
    }
}

impl Serialize for FieldId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How a field is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Multi-line textarea.
    TextArea,
}

/// One generated input with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub label: String,
    pub kind: FieldKind,
}

impl Field {
    fn new(id: FieldId, kind: FieldKind) -> Self {
        let label = match id {
            FieldId::Student(i) => format!("Enter Name of Student {}:", i + 1),
            FieldId::Question(i) => format!("Enter Question {}:", i + 1),
            FieldId::GptAnswer(i) => format!("Enter GPT Answer {}:", i + 1),
            FieldId::TextbookAnswer(i) => format!("Enter Textbook Answer {}:", i + 1),
            FieldId::Answer(q, s) => {
                format!("Enter Answer of Student {} for Question {}:", s + 1, q + 1)
            }
        };
        Self { id, label, kind }
    }
}

/// Fields generated for one question: the question itself, its two
/// reference answers, and one answer per student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBlock {
    pub question: Field,
    pub gpt_answer: Field,
    pub textbook_answer: Field,
    pub answers: Vec<Field>,
}

/// Declared student and question counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormCounts {
    pub students: usize,
    pub questions: usize,
}

/// Largest accepted student or question count.
pub const MAX_COUNT: usize = 500;

impl FormCounts {
    /// Counts within `0..=MAX_COUNT`.
    pub fn new(students: usize, questions: usize) -> Result<Self, FormError> {
        Ok(Self {
            students: check_count("students", students)?,
            questions: check_count("questions", questions)?,
        })
    }

    /// Parse counts as typed into the two numeric inputs.
    pub fn parse(students: &str, questions: &str) -> Result<Self, FormError> {
        Self::new(
            parse_count("students", students)?,
            parse_count("questions", questions)?,
        )
    }
}

fn invalid_count(field: &'static str, value: impl ToString) -> FormError {
    FormError::InvalidCount {
        field,
        value: value.to_string(),
        max: MAX_COUNT,
    }
}

fn check_count(field: &'static str, count: usize) -> Result<usize, FormError> {
    if count > MAX_COUNT {
        return Err(invalid_count(field, count));
    }
    Ok(count)
}

fn parse_count(field: &'static str, value: &str) -> Result<usize, FormError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| invalid_count(field, value))
}

/// The expanded form: every field generated for the declared counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormLayout {
    pub counts: FormCounts,
    pub students: Vec<Field>,
    pub questions: Vec<QuestionBlock>,
}

impl FormLayout {
    /// Generate the student and question regions for the given counts.
    ///
    /// Counts are expected to be bounded by [`FormCounts::new`].
    pub fn expand(counts: FormCounts) -> Self {
        let students = (0..counts.students)
            .map(|i| Field::new(FieldId::Student(i), FieldKind::Text))
            .collect();

        let questions = (0..counts.questions)
            .map(|q| QuestionBlock {
                question: Field::new(FieldId::Question(q), FieldKind::Text),
                gpt_answer: Field::new(FieldId::GptAnswer(q), FieldKind::TextArea),
                textbook_answer: Field::new(FieldId::TextbookAnswer(q), FieldKind::TextArea),
                answers: (0..counts.students)
                    .map(|s| Field::new(FieldId::Answer(q, s), FieldKind::TextArea))
                    .collect(),
            })
            .collect();

        Self {
            counts,
            students,
            questions,
        }
    }

    /// All fields in generation order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.students.iter().chain(self.questions.iter().flat_map(|b| {
            [&b.question, &b.gpt_answer, &b.textbook_answer]
                .into_iter()
                .chain(b.answers.iter())
        }))
    }

    /// Number of generated fields, summed from the layout itself.
    pub fn field_count(&self) -> usize {
        self.students.len()
            + self
                .questions
                .iter()
                .map(|b| 3 + b.answers.len())
                .sum::<usize>()
    }

    /// Whether `id` addresses a field generated by this layout.
    pub fn contains(&self, id: FieldId) -> bool {
        let FormCounts {
            students,
            questions,
        } = self.counts;
        match id {
            FieldId::Student(i) => i < students,
            FieldId::Question(i) | FieldId::GptAnswer(i) | FieldId::TextbookAnswer(i) => {
                i < questions
            }
            FieldId::Answer(q, s) => q < questions && s < students,
        }
    }

    /// Read the field values into a payload, in generation order.
    ///
    /// Fields without a value collect as empty strings.
    pub fn collect(&self, values: &FieldValues) -> SubmissionPayload {
        let roster = Roster(self.students.iter().map(|f| values.get_owned(f.id)).collect());
        let questions = self
            .questions
            .iter()
            .map(|b| Question {
                text: values.get_owned(b.question.id),
                gpt_answer: values.get_owned(b.gpt_answer.id),
                textbook_answer: values.get_owned(b.textbook_answer.id),
            })
            .collect();
        let answers = AnswerMatrix(
            self.questions
                .iter()
                .map(|b| b.answers.iter().map(|f| values.get_owned(f.id)).collect())
                .collect(),
        );
        SubmissionPayload::from_parts(roster, questions, answers)
    }

    /// Fields whose value is empty or whitespace only, in generation order.
    pub fn missing_fields(&self, values: &FieldValues) -> Vec<FieldId> {
        self.fields()
            .filter(|f| values.get(f.id).is_none_or(|v| v.trim().is_empty()))
            .map(|f| f.id)
            .collect()
    }
}

/// Current values of the generated inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(IndexMap<FieldId, String>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: FieldId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    fn get_owned(&self, id: FieldId) -> String {
        self.get(id).unwrap_or_default().to_string()
    }

    pub fn set(&mut self, id: FieldId, value: impl Into<String>) {
        self.0.insert(id, value.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.0.iter().map(|(id, v)| (*id, v.as_str()))
    }

    /// Drop values whose field is not part of `layout`.
    pub fn retain_in(&mut self, layout: &FormLayout) {
        self.0.retain(|id, _| layout.contains(*id));
    }
}

impl FromIterator<(FieldId, String)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (FieldId, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(students: usize, questions: usize) -> FormCounts {
        FormCounts {
            students,
            questions,
        }
    }

    #[test]
    fn expand_generates_one_input_per_student() {
        for n in [0, 1, 4] {
            let layout = FormLayout::expand(counts(n, 2));
            assert_eq!(layout.students.len(), n);
        }
    }

    #[test]
    fn expand_generates_question_blocks_and_answer_grid() {
        let layout = FormLayout::expand(counts(3, 2));
        assert_eq!(layout.questions.len(), 2);
        let answers: usize = layout.questions.iter().map(|b| b.answers.len()).sum();
        assert_eq!(answers, 6);
        assert!(layout.questions.iter().all(|b| b.answers.len() == 3));
        assert_eq!(layout.fields().count(), layout.field_count());
    }

    #[test]
    fn expand_zero_questions_is_empty_region() {
        let layout = FormLayout::expand(counts(2, 0));
        assert!(layout.questions.is_empty());
        assert_eq!(layout.fields().count(), 2);
    }

    #[test]
    fn field_order_matches_generation_order() {
        let layout = FormLayout::expand(counts(2, 1));
        let ids: Vec<String> = layout.fields().map(|f| f.id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "student0",
                "student1",
                "question0",
                "gptAnswer0",
                "textbookAnswer0",
                "answer0_0",
                "answer0_1"
            ]
        );
    }

    #[test]
    fn labels_are_one_based() {
        let layout = FormLayout::expand(counts(2, 2));
        assert_eq!(
            layout.questions[1].answers[0].label,
            "Enter Answer of Student 1 for Question 2:"
        );
        assert_eq!(layout.students[1].label, "Enter Name of Student 2:");
        assert_eq!(layout.questions[0].gpt_answer.kind, FieldKind::TextArea);
        assert_eq!(layout.questions[0].question.kind, FieldKind::Text);
    }

    #[test]
    fn field_id_parses_its_display_form() {
        for id in [
            FieldId::Student(12),
            FieldId::Question(0),
            FieldId::GptAnswer(3),
            FieldId::TextbookAnswer(1),
            FieldId::Answer(4, 7),
        ] {
            assert_eq!(id.to_string().parse::<FieldId>().unwrap(), id);
        }
        assert!("answer3".parse::<FieldId>().is_err());
        assert!("studentX".parse::<FieldId>().is_err());
        assert!("name0".parse::<FieldId>().is_err());
    }

    #[test]
    fn parse_counts_rejects_bad_input() {
        assert_eq!(FormCounts::parse(" 2 ", "3").unwrap(), counts(2, 3));
        assert!(FormCounts::parse("-1", "3").is_err());
        assert!(FormCounts::parse("two", "3").is_err());
        assert!(FormCounts::parse("", "3").is_err());
        assert!(matches!(
            FormCounts::parse("1", "1.5"),
            Err(FormError::InvalidCount {
                field: "questions",
                ..
            })
        ));
    }

    #[test]
    fn parse_counts_rejects_oversized_input() {
        assert!(matches!(
            FormCounts::parse("18446744073709551615", "0"),
            Err(FormError::InvalidCount {
                field: "students",
                max: MAX_COUNT,
                ..
            })
        ));
        assert!(FormCounts::parse("99999999999999999999999", "0").is_err());
        assert!(FormCounts::parse("0", &(MAX_COUNT + 1).to_string()).is_err());
        assert_eq!(
            FormCounts::parse(&MAX_COUNT.to_string(), "0").unwrap(),
            counts(MAX_COUNT, 0)
        );
        assert!(FormCounts::new(usize::MAX, 1).is_err());
    }

    #[test]
    fn field_count_at_the_bound() {
        let layout = FormLayout::expand(counts(MAX_COUNT, 2));
        assert_eq!(layout.field_count(), MAX_COUNT + 2 * (3 + MAX_COUNT));
        assert_eq!(layout.fields().count(), layout.field_count());
    }

    #[test]
    fn collect_reads_values_in_index_order() {
        let layout = FormLayout::expand(counts(2, 2));
        let mut values = FieldValues::new();
        values.set(FieldId::Student(1), "Bob");
        values.set(FieldId::Student(0), "Alice");
        values.set(FieldId::Question(1), "Q2");
        values.set(FieldId::Answer(1, 1), "bob-q2");
        values.set(FieldId::Answer(0, 0), "alice-q1");

        let payload = layout.collect(&values);
        assert_eq!(payload.students, vec!["Alice", "Bob"]);
        assert_eq!(payload.questions, vec!["", "Q2"]);
        assert_eq!(payload.answers[0], vec!["alice-q1", ""]);
        assert_eq!(payload.answers[1], vec!["", "bob-q2"]);
        assert!(payload.answers.iter().all(|row| row.len() == 2));
        assert!(payload.check_dimensions().is_ok());
    }

    #[test]
    fn missing_fields_treats_whitespace_as_empty() {
        let layout = FormLayout::expand(counts(1, 0));
        let mut values = FieldValues::new();
        values.set(FieldId::Student(0), "   ");
        assert_eq!(layout.missing_fields(&values), vec![FieldId::Student(0)]);

        values.set(FieldId::Student(0), "Ann");
        assert!(layout.missing_fields(&values).is_empty());
    }

    #[test]
    fn retain_in_drops_fields_outside_layout() {
        let mut values = FieldValues::new();
        values.set(FieldId::Student(0), "Alice");
        values.set(FieldId::Student(3), "Dan");
        values.set(FieldId::Answer(0, 3), "gone");

        values.retain_in(&FormLayout::expand(counts(2, 1)));
        assert_eq!(values.len(), 1);
        assert_eq!(values.get(FieldId::Student(0)), Some("Alice"));
    }
}
