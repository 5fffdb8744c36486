//! Explanation resolution
//!
//! The explanation is taken from the first non-empty known field. Failing
//! that, it is cut out of the question text at an embedded marker.

use serde::Serialize;
use serde_json::{Map, Value};

use super::lexicon::Lexicon;

/// Where the final explanation came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum ExplanationSource {
    /// A dedicated field on the candidate.
    Field(String),
    /// Split out of the question text at the labelled marker.
    Embedded(String),
    /// Nothing found; the explanation is empty.
    Missing,
}

/// Question text and explanation after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explained {
    pub question: String,
    pub explanation: String,
    pub source: ExplanationSource,
}

pub fn resolve_explanation(
    candidate: &Map<String, Value>,
    question: String,
    lexicon: &Lexicon,
) -> Explained {
    if let Some((field, explanation)) = from_fields(candidate, &lexicon.explanation_fields) {
        return Explained {
            question,
            explanation,
            source: ExplanationSource::Field(field.to_string()),
        };
    }

    let embedded = lexicon.markers.iter().find_map(|marker| {
        marker
            .split(&question)
            .map(|(q, e)| (marker.label.clone(), q.to_string(), e.to_string()))
    });
    if let Some((label, question, explanation)) = embedded {
        return Explained {
            question,
            explanation,
            source: ExplanationSource::Embedded(label),
        };
    }

    Explained {
        question,
        explanation: String::new(),
        source: ExplanationSource::Missing,
    }
}

/// First field in `fields` whose value is a non-blank scalar, trimmed.
fn from_fields<'f>(
    candidate: &Map<String, Value>,
    fields: &'f [String],
) -> Option<(&'f str, String)> {
    fields.iter().find_map(|field| {
        let text = match candidate.get(field)? {
            Value::String(s) => s.trim().to_string(),
            value @ (Value::Number(_) | Value::Bool(_)) => value.to_string(),
            _ => return None,
        };
        (!text.is_empty()).then_some((field.as_str(), text))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(candidate: Value) -> Explained {
        let question = candidate["question"].as_str().unwrap_or_default().to_string();
        let candidate = candidate.as_object().cloned().unwrap_or_default();
        resolve_explanation(&candidate, question, &Lexicon::default())
    }

    #[test]
    fn explanation_field_is_trimmed() {
        let out = resolve(json!({ "question": "Q", "explanation": "  because  " }));

        assert_eq!(out.explanation, "because");
        assert_eq!(out.question, "Q");
        assert_eq!(out.source, ExplanationSource::Field("explanation".into()));
    }

    #[test]
    fn fields_are_tried_in_lexicon_order() {
        let out = resolve(json!({
            "question": "Q",
            "comment": "from comment",
            "解説": "from kaisetsu",
            "explanation": "   "
        }));

        assert_eq!(out.explanation, "from kaisetsu");
        assert_eq!(out.source, ExplanationSource::Field("解説".into()));
    }

    #[test]
    fn embedded_label_splits_question() {
        let out = resolve(json!({ "question": "What is 2+2?\n解説: It is basic addition." }));

        assert_eq!(out.question, "What is 2+2?");
        assert_eq!(out.explanation, "It is basic addition.");
        assert_eq!(out.source, ExplanationSource::Embedded("解説".into()));
    }

    #[test]
    fn field_wins_over_embedded_label() {
        let out = resolve(json!({
            "question": "What is 2+2?\n解説: inline",
            "analysis": "from field"
        }));

        assert_eq!(out.question, "What is 2+2?\n解説: inline");
        assert_eq!(out.explanation, "from field");
    }

    #[test]
    fn correct_answer_block_becomes_explanation() {
        let out = resolve(json!({
            "question": "Which is prime?\nCorrect answer: B\n\nTwo is the only even prime."
        }));

        assert_eq!(out.question, "Which is prime?");
        assert_eq!(out.explanation, "Two is the only even prime.");
        assert_eq!(out.source, ExplanationSource::Embedded("Correct answer".into()));
    }

    #[test]
    fn nothing_found_yields_empty_string() {
        let out = resolve(json!({ "question": "Plain question?" }));

        assert_eq!(out.question, "Plain question?");
        assert_eq!(out.explanation, "");
        assert_eq!(out.source, ExplanationSource::Missing);
    }

    #[test]
    fn non_scalar_fields_are_ignored() {
        let out = resolve(json!({ "question": "Q", "explanation": ["a"], "rationale": 42 }));
        assert_eq!(out.explanation, "42");
    }
}
