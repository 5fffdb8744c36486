// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    extraction::{Normalizer, ResolvedQuestion},
    llm::prompt::{build_prompt, conversation},
    models::{
        exam_record::{ExamScore, QuestionResult, ScoreRequest, option_label},
        question::{GenerateRequest, GeneratedExam, QuestionRecord, QuestionsResponse},
    },
    state::AppState,
};

/// Generates a new exam with the configured model.
///
/// * Validates the request and builds the prompt (or takes the raw one).
/// * Sends `[system, user]` to the model.
/// * Extracts canonical questions from whatever text comes back.
///
/// Model failures and unparseable replies are reported as 502.
pub async fn generate_exam(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let prompt = build_prompt(&req)
        .ok_or_else(|| AppError::BadRequest("Prompt is required".to_string()))?;
    let messages = conversation(&state.config.system_prompt, prompt);

    let raw = state.llm.complete(&messages).await?;

    let resolved = state.normalizer.extract_resolved(&raw).map_err(|e| {
        tracing::warn!("Model reply could not be parsed: {}", e);
        AppError::BadGateway(e.to_string())
    })?;
    let (questions, unresolved_answers) = split_resolved(resolved);

    tracing::info!(
        questions = questions.len(),
        unresolved = unresolved_answers.len(),
        "Generated exam"
    );

    Ok(Json(GeneratedExam {
        exam_id: Uuid::new_v4(),
        exam_type: req.exam_type().map(str::to_string),
        created_at: Utc::now(),
        questions,
        unresolved_answers,
    }))
}

/// Normalizes a model reply the caller obtained on its own.
///
/// The body is the raw completion text. Unparseable text is a 400.
pub async fn normalize_reply(
    State(normalizer): State<Arc<Normalizer>>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let resolved = normalizer
        .extract_resolved(&body)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let (questions, unresolved_answers) = split_resolved(resolved);

    Ok(Json(QuestionsResponse {
        questions,
        unresolved_answers,
    }))
}

/// Scores a finished exam.
///
/// * Every answer key must point at an existing question.
/// * Unanswered questions count as wrong.
pub async fn score_exam(Json(req): Json<ScoreRequest>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(grade(&req)?))
}

/// Compares the selected options with the answer key.
pub fn grade(req: &ScoreRequest) -> Result<ExamScore, AppError> {
    let total_count = req.questions.len();

    if let Some(index) = req.answers.keys().find(|index| **index >= total_count) {
        return Err(AppError::BadRequest(format!(
            "Answer given for question {} but the exam has {} questions",
            index, total_count
        )));
    }

    let results: Vec<QuestionResult> = req
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let user_answer = req.answers.get(&index).copied();
            QuestionResult {
                index,
                user_answer,
                user_answer_label: user_answer.map(option_label),
                correct_answer: question.answer,
                correct_answer_label: option_label(question.answer),
                is_correct: user_answer == Some(question.answer),
            }
        })
        .collect();

    let correct_count = results.iter().filter(|r| r.is_correct).count();
    let percentage = if total_count == 0 {
        0
    } else {
        (correct_count as f64 * 100.0 / total_count as f64).round() as u32
    };

    Ok(ExamScore {
        correct_count,
        total_count,
        percentage,
        results,
    })
}

/// Records plus the indices whose answer fell back to 0.
fn split_resolved(resolved: Vec<ResolvedQuestion>) -> (Vec<QuestionRecord>, Vec<usize>) {
    let unresolved = resolved
        .iter()
        .enumerate()
        .filter(|(_, q)| q.answer_defaulted())
        .map(|(index, _)| index)
        .collect();
    let questions = resolved.into_iter().map(|q| q.record).collect();

    (questions, unresolved)
}
