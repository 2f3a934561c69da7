use thiserror::Error;

use crate::google::GoogleApiError;

#[derive(Debug, Error)]
pub enum BriefError {
    #[error("Failed to access Google API: {0}")]
    GoogleApi(String),

    #[error("Failed to access OpenAI API: {0}")]
    OpenAi(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Failed to render briefing: {0}")]
    Render(String),
}

impl From<GoogleApiError> for BriefError {
    fn from(error: GoogleApiError) -> Self {
        BriefError::GoogleApi(error.to_string())
    }
}

impl From<reqwest::Error> for BriefError {
    fn from(error: reqwest::Error) -> Self {
        BriefError::Http(error.to_string())
    }
}

impl From<askama::Error> for BriefError {
    fn from(error: askama::Error) -> Self {
        BriefError::Render(error.to_string())
    }
}
