use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::core::extraction::{extraction_prompt, resolve_food_choices};
use crate::core::{Judge, JudgeError, JudgePrompt};

/// Errors that can occur when talking to the language model server
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Model server returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Model server did not answer within {0:?}")]
    Timeout(Duration),
}

impl From<LlmError> for JudgeError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(limit) => JudgeError::Timeout(limit),
            other => JudgeError::Invocation(other.to_string()),
        }
    }
}

/// Sampling parameters for one completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
    repeat_penalty: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: Option<String>,
}

/// Client for a llama.cpp-compatible completion server
///
/// Serves two purposes:
/// - judging food compatibility between two users
/// - extracting food choices from a free-text description
pub struct LlmClient {
    endpoint: String,
    client: Client,
    timeout: Duration,
    judge_params: CompletionParams,
    extract_params: CompletionParams,
}

impl LlmClient {
    /// Create a new client with a per-request timeout
    pub fn new(
        endpoint: String,
        timeout: Duration,
        judge_params: CompletionParams,
        extract_params: CompletionParams,
    ) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            client,
            timeout,
            judge_params,
            extract_params,
        })
    }

    /// Run one completion and return the raw generated text
    pub async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<String, LlmError> {
        let url = format!("{}/completion", self.endpoint.trim_end_matches('/'));

        let body = CompletionRequest {
            prompt,
            n_predict: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            repeat_penalty: params.repeat_penalty,
            stream: false,
        };

        tracing::debug!("Requesting completion from: {} ({} prompt bytes)", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        if !response.status().is_success() {
            return Err(LlmError::ApiError(format!(
                "Completion failed: {}",
                response.status()
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::InvalidResponse(format!("Failed to parse completion: {}", e))
                }
            })?;

        completion
            .content
            .map(|text| text.trim().to_string())
            .ok_or_else(|| LlmError::InvalidResponse("Missing content field".into()))
    }

    fn request_error(&self, err: reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::RequestError(err)
        }
    }

    /// Food choices the user says they like; never fails
    ///
    /// Falls back to a keyword scan of the description when the model is
    /// unreachable or ignores the output format.
    pub async fn extract_food_choices(&self, description: &str) -> Vec<String> {
        let prompt = extraction_prompt(description);

        match self.complete(&prompt, &self.extract_params).await {
            Ok(raw) => resolve_food_choices(Some(&raw), description),
            Err(e) => {
                tracing::warn!("Food extraction failed, scanning description instead: {}", e);
                resolve_food_choices(None, description)
            }
        }
    }
}

#[async_trait]
impl Judge for LlmClient {
    async fn invoke(&self, prompt: &JudgePrompt) -> Result<String, JudgeError> {
        Ok(self.complete(&prompt.render(), &self.judge_params).await?)
    }
}
