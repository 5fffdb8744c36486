// tests/common/mod.rs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use exam_forge::{
    config::{Config, LlmProvider},
    llm::{ChatMessage, LlmClient, LlmError},
    routes,
    state::AppState,
};

/// Answers every conversation with the same canned reply and remembers the prompts.
pub struct StubLlm {
    reply: Result<String, u16>,
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubLlm {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmClient for StubLlm {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Status {
                status: *status,
                body: "upstream unavailable".to_string(),
            }),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        llm_api_url: "http://127.0.0.1:9/v1/chat/completions".parse().unwrap(),
        llm_api_key: "test-key".to_string(),
        llm_provider: LlmProvider::OpenAi,
        llm_model: "test-model".to_string(),
        llm_timeout_secs: 5,
        system_prompt: "You write exams.".to_string(),
        explanation_fields: vec!["why".to_string()],
        allowed_origins: vec!["http://localhost:3000".to_string()],
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_dir: "logs".to_string(),
        rust_log: "error".to_string(),
    }
}

/// Spawns the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
pub async fn spawn_app(llm: Arc<dyn LlmClient>) -> String {
    let state = AppState::new(test_config(), llm);
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}
