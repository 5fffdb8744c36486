// src/config.rs

use std::env;
use std::net::SocketAddr;

use dotenvy::dotenv;
use url::Url;

pub const DEFAULT_SYSTEM_PROMPT: &str = "あなたは優秀な試験問題作成者です。";

/// How the API key is presented to the chat-completions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Azure,
}

impl LlmProvider {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(LlmProvider::OpenAi),
            "azure" => Some(LlmProvider::Azure),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub llm_api_url: Url,
    pub llm_api_key: String,
    pub llm_provider: LlmProvider,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub system_prompt: String,
    /// Extra explanation field names, appended to the built-in lexicon.
    pub explanation_fields: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub bind_addr: SocketAddr,
    pub log_dir: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let llm_api_key = env::var("LLM_API_KEY")
            .expect("LLM_API_KEY must be set");

        let llm_api_url = env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string())
            .parse()
            .expect("LLM_API_URL must be a valid URL");

        let llm_provider = env::var("LLM_PROVIDER")
            .map(|v| LlmProvider::parse(&v).expect("LLM_PROVIDER must be 'openai' or 'azure'"))
            .unwrap_or(LlmProvider::OpenAi);

        let llm_model = env::var("LLM_MODEL")
            .unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let llm_timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let system_prompt = env::var("SYSTEM_PROMPT")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.to_string());

        let explanation_fields = env::var("EXPLANATION_FIELDS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .expect("BIND_ADDR must be a socket address");

        let log_dir = env::var("LOG_DIR")
            .unwrap_or_else(|_| "logs".to_string());

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            llm_api_url,
            llm_api_key,
            llm_provider,
            llm_model,
            llm_timeout_secs,
            system_prompt,
            explanation_fields,
            allowed_origins,
            bind_addr,
            log_dir,
            rust_log,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
