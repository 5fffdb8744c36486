//! # Question extraction
//!
//! Turns the raw text of an LLM reply into canonical [`QuestionRecord`]s.
//!
//! ```text
//! raw text → unwrap (fences, prose, JSON) → normalize (answers, explanations) → records
//! ```
//!
//! Only [`ExtractError::MalformedPayload`] is ever returned. Payloads of the
//! wrong shape and candidates with unusable fields degrade to empty lists and
//! safe defaults.

pub mod answer;
pub mod error;
pub mod explanation;
pub mod lexicon;
pub mod normalize;
pub mod unwrap;

pub use answer::AnswerSource;
pub use error::ExtractError;
pub use explanation::ExplanationSource;
pub use lexicon::{EmbeddedMarker, Lexicon};
pub use normalize::{Normalizer, ResolvedQuestion, normalize};
pub use unwrap::unwrap_response;

use crate::models::question::QuestionRecord;

/// Unwraps and normalizes in one go with the built-in lexicon.
pub fn extract_questions(raw: &str) -> Result<Vec<QuestionRecord>, ExtractError> {
    Normalizer::shared().extract(raw)
}

impl Normalizer {
    /// Unwraps `raw` and normalizes the payload.
    pub fn extract(&self, raw: &str) -> Result<Vec<QuestionRecord>, ExtractError> {
        let payload = unwrap_response(raw)?;
        Ok(self.normalize(&payload))
    }

    /// Unwraps `raw` and resolves the payload, keeping provenance.
    pub fn extract_resolved(&self, raw: &str) -> Result<Vec<ResolvedQuestion>, ExtractError> {
        let payload = unwrap_response(raw)?;
        Ok(self.resolve(&payload))
    }
}
