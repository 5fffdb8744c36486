//! Chat-completion backends used to generate questions
//!
//! The HTTP layer talks to an [`LlmClient`] only, so tests can swap in a
//! canned reply instead of a real model.

pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use openai::OpenAiClient;

/// One message of a chat-completion conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out")]
    Timeout,

    #[error("could not reach the model endpoint: {0}")]
    Transport(String),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode the completion: {0}")]
    Decode(String),

    #[error("model returned an empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_decode() {
            LlmError::Decode(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}

/// Something that answers a chat conversation with text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the text content of the first completion choice.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}
