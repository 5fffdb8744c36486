// src/models/exam_record.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::question::QuestionRecord;

/// DTO for scoring a finished exam.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// The questions exactly as they were handed to the candidate.
    pub questions: Vec<QuestionRecord>,

    /// User's answers map.
    /// Key: question index within `questions`
    /// Value: selected option index
    #[serde(default)]
    pub answers: HashMap<usize, usize>,
}

/// Outcome of a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub index: usize,
    pub user_answer: Option<usize>,
    pub user_answer_label: Option<String>,
    pub correct_answer: usize,
    pub correct_answer_label: String,
    pub is_correct: bool,
}

/// Aggregated score for a whole exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamScore {
    pub correct_count: usize,
    pub total_count: usize,
    /// Rounded to the nearest whole percent, 0 for an empty exam.
    pub percentage: u32,
    pub results: Vec<QuestionResult>,
}

/// Letter shown next to an option: 0 → "A", 1 → "B", …
///
/// Indices past "Z" fall back to the 1-based number.
pub fn option_label(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i).to_string())
        .unwrap_or_else(|| (index + 1).to_string())
}
