//! HTTP client for the coaching service
//!
//! Talks to an OpenAI-compatible chat completions endpoint (Groq by default).
//! Each call is a single request with no retries.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};

use super::error::CoachError;
use super::models::{ChatCompletionRequest, ChatCompletionResponse, Language, extract_error_message};
use super::prompts;
use crate::config::Config;

/// Anything that can turn a prompt into coaching text
pub trait Coach: Send + Sync {
    /// Send one prompt and return the generated text verbatim
    fn complete(
        &self,
        prompt: &str,
        language: Language,
    ) -> impl Future<Output = Result<String, CoachError>> + Send;

    /// Ask for step-by-step hints on a problem
    fn hints(
        &self,
        problem: &str,
        language: Language,
    ) -> impl Future<Output = Result<String, CoachError>> + Send {
        let prompt = prompts::hint_prompt(problem, language);
        async move { self.complete(&prompt, language).await }
    }

    /// Ask for a review of submitted code
    fn review(
        &self,
        problem: &str,
        code: &str,
        language: Language,
    ) -> impl Future<Output = Result<String, CoachError>> + Send {
        let prompt = prompts::review_prompt(problem, code, language);
        async move { self.complete(&prompt, language).await }
    }
}

/// Chat completions client
pub struct CoachClient {
    /// HTTP client
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Endpoint base, e.g. `https://api.groq.com/openai/v1`
    base_url: String,
    /// Model identifier
    model: String,
    /// Optional cap on generated tokens
    max_tokens: Option<u32>,
}

impl CoachClient {
    /// Create a new client with the given API key and configuration
    pub fn new(api_key: String, config: &Config) -> Result<Self, CoachError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Send a chat completion request and return the parsed response
    pub async fn send(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CoachError> {
        let response = self
            .client
            .post(self.endpoint())
            .header(USER_AGENT, concat!("dsa-coach/", env!("CARGO_PKG_VERSION")))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(CoachError::RateLimited { retry_after_seconds: retry_after });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(CoachError::ApiError {
                status: 401,
                message: "Invalid API key".to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body).unwrap_or(body);
            return Err(CoachError::ApiError { status: status.as_u16(), message });
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        Ok(parsed)
    }
}

impl Coach for CoachClient {
    async fn complete(&self, prompt: &str, language: Language) -> Result<String, CoachError> {
        let mut request =
            ChatCompletionRequest::new(&self.model, prompts::system_prompt(language), prompt);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let started = Instant::now();
        let response = self.send(&request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                model = %self.model,
                elapsed_ms = started.elapsed().as_millis() as u64,
                prompt_tokens = ?usage.prompt_tokens,
                completion_tokens = ?usage.completion_tokens,
                "Coaching completion received"
            );
        }

        response.first_text().map(str::to_string).ok_or(CoachError::EmptyCompletion)
    }
}
