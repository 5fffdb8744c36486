//! Maps loosely-typed question candidates onto canonical records

use std::sync::LazyLock;

use serde_json::{Map, Value};

use super::answer::{AnswerSource, resolve_answer};
use super::explanation::{ExplanationSource, resolve_explanation};
use super::lexicon::Lexicon;
use crate::models::question::QuestionRecord;

static DEFAULT_NORMALIZER: LazyLock<Normalizer> = LazyLock::new(Normalizer::default);

/// A canonical record plus how its fields were obtained.
///
/// `answer_source == AnswerSource::Defaulted` means the answer index is a
/// fallback, indistinguishable from a genuine index 0 in the record alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuestion {
    pub record: QuestionRecord,
    pub answer_source: AnswerSource,
    pub explanation_source: ExplanationSource,
}

impl ResolvedQuestion {
    pub fn answer_defaulted(&self) -> bool {
        self.answer_source == AnswerSource::Defaulted
    }
}

/// Stateless normalizer over a fixed [`Lexicon`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    lexicon: Lexicon,
}

impl Normalizer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Shared instance over the built-in lexicon.
    pub fn shared() -> &'static Normalizer {
        &DEFAULT_NORMALIZER
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Canonical records for every candidate in `payload`, in order.
    pub fn normalize(&self, payload: &Value) -> Vec<QuestionRecord> {
        self.resolve(payload)
            .into_iter()
            .map(|resolved| resolved.record)
            .collect()
    }

    /// Like [`Normalizer::normalize`] but keeps the per-field provenance.
    ///
    /// Accepts a bare array of candidates or an object with a `questions`
    /// array. Any other shape yields nothing.
    pub fn resolve(&self, payload: &Value) -> Vec<ResolvedQuestion> {
        let Some(candidates) = candidate_list(payload) else {
            tracing::debug!("payload has no question list, returning no questions");
            return Vec::new();
        };

        candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| match candidate.as_object() {
                Some(fields) => Some(self.resolve_candidate(fields)),
                None => {
                    tracing::warn!(index, "skipping question candidate that is not an object");
                    None
                }
            })
            .collect()
    }

    fn resolve_candidate(&self, candidate: &Map<String, Value>) -> ResolvedQuestion {
        let options = options_of(candidate);
        let (answer, answer_source) = resolve_answer(candidate.get("answer"), &options);
        if answer_source == AnswerSource::Defaulted {
            tracing::debug!(
                answer = ?candidate.get("answer"),
                options = options.len(),
                "answer could not be resolved, defaulting to 0"
            );
        }

        let question = question_of(candidate, &self.lexicon);
        let explained = resolve_explanation(candidate, question, &self.lexicon);

        ResolvedQuestion {
            record: QuestionRecord {
                question: explained.question,
                options,
                answer,
                explanation: explained.explanation,
            },
            answer_source,
            explanation_source: explained.source,
        }
    }
}

/// Normalizes with the built-in lexicon.
pub fn normalize(payload: &Value) -> Vec<QuestionRecord> {
    Normalizer::shared().normalize(payload)
}

fn candidate_list(payload: &Value) -> Option<&Vec<Value>> {
    match payload {
        Value::Array(items) => Some(items),
        Value::Object(fields) => fields.get("questions")?.as_array(),
        _ => None,
    }
}

fn options_of(candidate: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(options)) = candidate.get("options") else {
        return Vec::new();
    };

    options
        .iter()
        .map(|option| match option {
            Value::String(s) => s.trim().to_string(),
            Value::Null => String::new(),
            other => other.to_string().trim().to_string(),
        })
        .collect()
}

fn question_of(candidate: &Map<String, Value>, lexicon: &Lexicon) -> String {
    match candidate.get("question") {
        Some(Value::String(s)) => s.clone(),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => value.to_string(),
        _ => lexicon.placeholder_question.clone(),
    }
}
