use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message and article content are required")]
    MissingInput,
    #[error("Gemini API key not configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request to model API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("model API returned no text")]
    EmptyResponse,
}

/// One prior turn of the conversation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

/// Reply relayed back to the caller.
#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub success: bool,
}

/// Prompt with the article embedded, prior turns, and the open assistant turn.
pub fn build_prompt(article_content: &str, history: &[Turn], message: &str) -> String {
    let mut prompt = format!(
        "You are a helpful AI assistant that answers questions about a specific article.\n\n\
         Here is the article content you should base your answers on:\n\n\
         ---\n{article_content}\n---\n\n\
         Please answer questions based on this article content. If a question is not related \
         to the article or cannot be answered using the information provided, politely explain \
         that you can only help with questions about this specific article.\n\
         If the question is related to the article but does not provide context, you can answer \
         from your knowledge.\n\
         Keep your responses concise but informative. Use a friendly and helpful tone.\n\n"
    );

    for turn in history {
        let speaker = if turn.role == "user" { "User" } else { "Assistant" };
        prompt.push_str(&format!("{}: {}\n", speaker, turn.content));
    }
    prompt.push_str(&format!("User: {}\nAssistant: ", message));
    prompt
}

/// Concatenated text parts of the first candidate.
fn extract_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text")?.as_str())
        .collect();
    (!text.is_empty()).then_some(text)
}

pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, ChatError> {
        let api_key = settings.api_key().ok_or(ChatError::MissingApiKey)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: settings.gemini_base_url.trim_end_matches('/').to_string(),
            model: settings.gemini_model.clone(),
            api_key: api_key.to_string(),
        })
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        debug!(model = %self.model, prompt_len = prompt.len(), "sending prompt");
        let response = self
            .http
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        extract_text(&value).ok_or(ChatError::EmptyResponse)
    }

    /// Validate input, build the prompt, and relay the model's answer.
    pub async fn ask(
        &self,
        article_content: &str,
        history: &[Turn],
        message: &str,
    ) -> Result<ChatReply, ChatError> {
        if message.is_empty() || article_content.is_empty() {
            return Err(ChatError::MissingInput);
        }
        let prompt = build_prompt(article_content, history, message);
        let response = self.generate(&prompt).await?;
        info!(chars = response.len(), "model answered");
        Ok(ChatReply {
            response,
            success: true,
        })
    }
}
