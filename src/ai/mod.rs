//! Summarization of the merged corpus.

pub mod client;

// Re-export main types for convenience
pub use client::LlmClient;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::AppConfig;

/// Fixed response for the all-sources-empty day; returned without any
/// network call.
pub const NOTHING_TO_SUMMARIZE: &str = "No email or meeting content available to summarize.";

/// Summarization port. Infallible by contract: failures come back as a
/// descriptive error string so the pipeline still produces a briefing.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, corpus: &str) -> String;
}

/// OpenAI-backed summarizer; degrades to an error message when the API key
/// is not configured or the API call fails.
pub struct OpenAiSummarizer {
    client: Option<LlmClient>,
}

impl OpenAiSummarizer {
    pub fn from_config(config: &AppConfig) -> Self {
        let client = config.openai_api_key.clone().map(|api_key| {
            LlmClient::new(
                api_key,
                config.openai_model.clone(),
                config.primary_user.clone(),
                config.colleagues.clone(),
            )
        });
        Self { client }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, corpus: &str) -> String {
        if corpus.trim().is_empty() {
            info!("No text provided for AI summary");
            return NOTHING_TO_SUMMARIZE.to_string();
        }

        let Some(client) = &self.client else {
            error!("OPENAI_API_KEY not found in environment");
            return "Error: OpenAI API key not configured.".to_string();
        };

        match client.generate_summary(client.build_prompt(corpus)).await {
            Ok(summary) => {
                info!("OpenAI summary generated successfully");
                summary
            }
            Err(e) => {
                error!("OpenAI summarization failed: {}", e);
                format!("Error generating AI summary: {}", e)
            }
        }
    }
}
