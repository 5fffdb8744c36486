use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::Config;
use crate::extraction::{Lexicon, Normalizer};
use crate::llm::LlmClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn LlmClient>,
    pub normalizer: Arc<Normalizer>,
}

impl AppState {
    /// Builds the state, extending the lexicon with the configured field names.
    pub fn new(config: Config, llm: Arc<dyn LlmClient>) -> Self {
        let lexicon = Lexicon::default().with_explanation_fields(config.explanation_fields.clone());

        Self {
            config,
            llm,
            normalizer: Arc::new(Normalizer::new(lexicon)),
        }
    }
}

impl FromRef<AppState> for Arc<Normalizer> {
    fn from_ref(state: &AppState) -> Self {
        state.normalizer.clone()
    }
}
