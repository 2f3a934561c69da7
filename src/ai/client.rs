//! LLM (OpenAI) API client module
//!
//! Encapsulates the chat-completion call that turns the merged corpus into
//! the briefing summary.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

use crate::errors::BriefError;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const MAX_OUTPUT_TOKENS: usize = 1000;
/// Near-deterministic phrasing, not creative writing.
const TEMPERATURE: f64 = 0.5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// OpenAI client for generating the briefing summary.
pub struct LlmClient {
    api_key: String,
    model_name: String,
    primary_user: String,
    colleagues: String,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        model_name: Option<String>,
        primary_user: String,
        colleagues: String,
    ) -> Self {
        Self {
            api_key,
            model_name: model_name.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            primary_user,
            colleagues,
        }
    }

    /// Fixed instruction prompt plus the corpus as user content.
    pub fn build_prompt(&self, corpus: &str) -> Vec<ChatCompletionMessage> {
        let system_message = format!(
            "You are a highly efficient executive assistant. Your task is to analyze the \
             provided text, which includes emails and personal task notes. Consolidate this \
             information and extract ONLY the following:\n\n\
             1. Key Decisions: List any significant decisions explicitly mentioned.\n\n\
             2. Action Items ({primary}): List all action items assigned specifically to \
             {primary}. Include any mentioned due dates.\n\n\
             3. Action Items (Others): List action items assigned to {others} that have \
             upcoming due dates (e.g., today, tomorrow, this week). Be specific about who is \
             responsible.\n\n\
             4. Due Dates: List any other major deadlines or due dates mentioned.\n\n\
             Format the output clearly with headings for each section. If no information is \
             found for a section, state 'None identified'. Be concise and focus only on these \
             points.",
            primary = self.primary_user,
            others = self.colleagues,
        );

        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(system_message),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(format!(
                    "Analyze the following content from yesterday and today:\n\n{corpus}"
                )),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    pub async fn generate_summary(
        &self,
        prompt: Vec<ChatCompletionMessage>,
    ) -> Result<String, BriefError> {
        info!(
            "Requesting summary from {} ({} prompt messages)",
            self.model_name,
            prompt.len()
        );

        let messages: Vec<Value> = prompt
            .iter()
            .map(|msg| {
                let role_str = match msg.role {
                    MessageRole::system => "system",
                    MessageRole::user => "user",
                    MessageRole::assistant => "assistant",
                    MessageRole::function => "function",
                    MessageRole::tool => "tool",
                };
                let content = match &msg.content {
                    Content::Text(text) => text.clone(),
                    _ => String::new(),
                };
                json!({ "role": role_str, "content": content })
            })
            .collect();

        let request_body = json!({
            "model": self.model_name,
            "messages": messages,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": TEMPERATURE,
        });

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let response = client
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BriefError::Http(format!("OpenAI API request failed: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BriefError::OpenAi(format!(
                "OpenAI API error: {}",
                error_text
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| BriefError::OpenAi(format!("Failed to parse OpenAI response: {}", e)))?;

        response_json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str())
            .map(|text| text.trim().to_string())
            .ok_or_else(|| BriefError::OpenAi("No text in response".to_string()))
    }
}
