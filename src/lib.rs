// src/lib.rs

pub mod config;
pub mod error;
pub mod extraction;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod routes;
pub mod state;

// Re-export specific items for convenience if needed
pub use extraction::{ExtractError, extract_questions, normalize, unwrap_response};
pub use models::question::QuestionRecord;
pub use routes::create_router;
