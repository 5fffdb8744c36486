// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A canonical multiple-choice question.
///
/// Every record handed out by the normalizer satisfies:
/// * `answer < options.len()`, or `answer == 0` when there are no options.
/// * `explanation` is always present (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// The question text shown to the candidate.
    pub question: String,

    /// Answer choices in display order, each trimmed.
    pub options: Vec<String>,

    /// Zero-based index of the correct option.
    pub answer: usize,

    /// Why the correct option is correct.
    pub explanation: String,
}

/// How hard the generated questions should be.
///
/// Serialized with the labels the exam front-end sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "初心者向け")]
    Beginner,
    #[default]
    #[serde(rename = "試験相応")]
    ExamLevel,
    #[serde(rename = "専門家向け")]
    Expert,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Beginner => "初心者向け",
            Difficulty::ExamLevel => "試験相応",
            Difficulty::Expert => "専門家向け",
        }
    }
}

fn default_question_count() -> u32 {
    3
}

/// DTO for requesting a freshly generated exam.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Name of the exam or subject, e.g. "データベース".
    #[validate(length(max = 200))]
    pub exam_type: Option<String>,

    /// Page the questions should be based on.
    #[validate(url)]
    pub reference_url: Option<String>,

    /// Study material pasted directly by the user.
    #[validate(length(max = 20000))]
    pub reference_text: Option<String>,

    #[serde(default = "default_question_count")]
    #[validate(range(min = 1, max = 10))]
    pub question_count: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    /// Raw prompt. When present it is sent as-is instead of the built one.
    #[validate(length(max = 20000))]
    pub prompt: Option<String>,
}

impl GenerateRequest {
    /// The exam name, if one was given and it is not blank.
    pub fn exam_type(&self) -> Option<&str> {
        non_blank(self.exam_type.as_deref())
    }

    /// The raw prompt override, if one was given and it is not blank.
    pub fn raw_prompt(&self) -> Option<&str> {
        non_blank(self.prompt.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Response body for `/api/normalize`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionRecord>,

    /// Indices of questions whose answer could not be resolved and fell back to 0.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_answers: Vec<usize>,
}

/// Response body for `/api/generate`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedExam {
    pub exam_id: Uuid,
    pub exam_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub questions: Vec<QuestionRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_answers: Vec<usize>,
}
