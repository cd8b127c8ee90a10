//! OpenAI chat-completions assessment engine

use crate::assess::prompt::{file_prompt, repository_prompt, SYSTEM_PROMPT};
use crate::assess::{parse_repository_assessment, AssessmentEngine, RepositoryAssessment};
use crate::config::schema::OpenAiConfig;
use crate::error::{AssessmentError, CriticError, CriticResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// Assessment engine calling an OpenAI-compatible chat endpoint
#[derive(Debug, Clone)]
pub struct OpenAiEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiEngine {
    /// Create a new engine; an API key is required
    pub fn new(config: &OpenAiConfig) -> CriticResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(CriticError::ConfigMissing("openai.api_key"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CriticError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
        })
    }

    /// Run one completion and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String, AssessmentError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssessmentError::Failed(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => {}
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("OpenAI rate limit reached");
                return Err(AssessmentError::RateLimited);
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                return Err(AssessmentError::Failed(format!("HTTP {status}: {body}")));
            }
        }

        let reply: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AssessmentError::Decode(e.to_string()))?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AssessmentError::Decode("completion has no content".to_string()))
    }
}

#[async_trait]
impl AssessmentEngine for OpenAiEngine {
    async fn assess_file(
        &self,
        content: &str,
        requirements: &str,
    ) -> Result<String, AssessmentError> {
        let review = self.complete(&file_prompt(content, requirements)).await?;
        debug!("File assessment: {} chars", review.len());
        Ok(review)
    }

    async fn assess_repository(
        &self,
        reviews: &str,
    ) -> Result<RepositoryAssessment, AssessmentError> {
        let reply = self.complete(&repository_prompt(reviews)).await?;
        parse_repository_assessment(&reply)
    }

    fn engine_name(&self) -> &'static str {
        "openai"
    }
}
