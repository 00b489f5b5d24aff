use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::llm::{build_http_client, LLMAdapter, LLMRequest, LLMResponse, ModelConfig, Usage};

pub const DEFAULT_GROQ_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqAdapter {
    client: Client,
    config: ModelConfig,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_completion_tokens: usize,
    stream: bool,
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: Option<String>,
}

#[derive(Deserialize)]
struct GroqResponse {
    choices: Vec<Choice>,
    model: String,
    usage: Option<GroqUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct GroqUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[derive(Deserialize)]
struct GroqErrorBody {
    error: GroqErrorDetail,
}

#[derive(Deserialize)]
struct GroqErrorDetail {
    message: String,
}

impl GroqAdapter {
    pub fn new(config: ModelConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("Groq API key not found. Set GROQ_API_KEY environment variable or provide in config")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let client = build_http_client(&config)?;

        Ok(Self {
            client,
            config,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl LLMAdapter for GroqAdapter {
    async fn complete(&self, request: LLMRequest) -> Result<LLMResponse> {
        let groq_request = GroqRequest {
            model: self.config.model_name.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: Some(request.system_prompt),
                },
                Message {
                    role: "user".to_string(),
                    content: Some(request.user_prompt),
                },
            ],
            temperature: request.temperature.unwrap_or(self.config.temperature),
            max_completion_tokens: request.max_tokens.unwrap_or(self.config.max_tokens),
            stream: false,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&groq_request)
            .send()
            .await
            .context("Failed to send request to Groq")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Groq API error ({}): {}", status, describe_error(status, &body));
        }

        let groq_response: GroqResponse = response
            .json()
            .await
            .context("Failed to parse Groq response")?;

        let content = groq_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        info!("Groq response received: {} characters", content.chars().count());

        Ok(LLMResponse {
            content,
            model: groq_response.model,
            usage: groq_response.usage.map(|usage| Usage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
        })
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

// Groq wraps failures in `{"error": {"message": ...}}`.
fn describe_error(status: StatusCode, body: &str) -> String {
    let message = serde_json::from_str::<GroqErrorBody>(body)
        .map(|parsed| parsed.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        format!("rate limit reached: {}", message)
    } else {
        message
    }
}
