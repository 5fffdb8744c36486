//! Error types for question extraction

use thiserror::Error;

/// The only extraction failure that reaches callers.
///
/// Shape mismatches and unresolvable fields degrade to defaults instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// No JSON object or array could be recovered from the model output.
    #[error("malformed model payload: {reason}")]
    MalformedPayload { reason: String },
}

impl ExtractError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ExtractError::MalformedPayload {
            reason: reason.into(),
        }
    }
}
