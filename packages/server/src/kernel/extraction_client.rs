//! Client for the natural-language project extraction service.
//!
//! Takes the free text a user typed about their project and asks an LLM
//! chat-completion endpoint to produce a structured draft: a concise title,
//! a short summary a grants officer can scan, the untouched original text,
//! and search keywords.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are an assistant helping local organisations \
formulate their projects clearly so they can obtain public grants and subsidies.";

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("extraction request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("extraction service returned {status}: {detail}")]
    Upstream { status: u16, detail: String },

    #[error("extraction service returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Structured project draft produced from free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub title: String,
    pub summary: String,
    /// The user's original text, unmodified
    #[serde(default)]
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

#[async_trait]
pub trait ProjectExtractor: Send + Sync {
    async fn extract(&self, free_text: &str) -> Result<ProjectDraft, ExtractionError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// OpenAI-backed extractor
pub struct OpenAiExtractor {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiExtractor {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            api_key,
            model: "gpt-4o".to_string(),
            client,
        })
    }

    fn user_prompt(free_text: &str) -> String {
        format!(
            "Here is the text the user typed:\n\n\"{free_text}\"\n\n\
             Your task is threefold:\n\
             1. Extract a concise, punchy title for this project (at most 10 words)\n\
             2. Write a structured summary of the project (about 3-5 sentences) that \
             presents its stakes clearly, without jargon, so a grants officer can \
             understand it quickly\n\
             3. Extract a list of keywords useful for grant search, focusing on: \
             sector of activity, type of organisation, audiences served, objectives, \
             themes, territory.\n\n\
             Answer as JSON with the following fields:\n\
             - \"title\": concise project title\n\
             - \"summary\": structured summary\n\
             - \"description\": the user's original text (unmodified)\n\
             - \"keywords\": array of keywords (each keyword a string)"
        )
    }
}

#[async_trait]
impl ProjectExtractor for OpenAiExtractor {
    async fn extract(&self, free_text: &str) -> Result<ProjectDraft, ExtractionError> {
        let request = ChatRequest {
            model: self.model.clone(),
            temperature: 0.4,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::user_prompt(free_text),
                },
            ],
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Upstream {
                status: status.as_u16(),
                detail,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ExtractionError::InvalidResponse("no choices returned".into()))?;

        let mut draft: ProjectDraft = serde_json::from_str(&content)
            .map_err(|e| ExtractionError::InvalidResponse(format!("not valid JSON: {e}")))?;

        if draft.title.is_empty() || draft.summary.is_empty() {
            return Err(ExtractionError::InvalidResponse(
                "missing title or summary".into(),
            ));
        }

        // The model occasionally omits the echo of the original text
        if draft.description.as_deref().unwrap_or("").is_empty() {
            draft.description = Some(free_text.to_string());
        }

        Ok(draft)
    }
}
