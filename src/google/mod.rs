//! Native Google API access over reqwest.
//!
//! Token format is compatible with the token.json written by Python's
//! google-auth library, so an existing authorization carries over. Credential
//! acquisition happens once at startup; the adapters in [`calendar`] and
//! [`gmail`] then carry a bearer token for the rest of the run.

pub mod auth;
pub mod calendar;
pub mod gmail;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AppConfig;

/// OAuth2 scopes the briefing needs: read calendar, read mail, send mail.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.send",
];

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// OAuth2 token payload persisted to the token file.
///
/// Field names match what `google.oauth2.credentials.Credentials.to_json()`
/// produces; `access_token` is accepted as an alias on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleToken {
    #[serde(alias = "access_token")]
    pub token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Expiry instant, ISO 8601.
    #[serde(default)]
    pub expiry: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// OAuth2 client credentials from credentials.json (Desktop App type).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientCredentials {
    pub installed: InstalledAppCredentials,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledAppCredentials {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub auth_uri: String,
    pub token_uri: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GoogleApiError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token expired or revoked")]
    AuthExpired,
    #[error("Credentials file not found at {0}")]
    CredentialsNotFound(PathBuf),
    #[error("Token not found at {0}")]
    TokenNotFound(PathBuf),
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("OAuth flow cancelled")]
    FlowCancelled,
}

// ============================================================================
// Token I/O
// ============================================================================

pub fn load_token(path: &Path) -> Result<GoogleToken, GoogleApiError> {
    if !path.exists() {
        return Err(GoogleApiError::TokenNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_token(path: &Path, token: &GoogleToken) -> Result<(), GoogleApiError> {
    let json = serde_json::to_string_pretty(token)?;
    std::fs::write(path, json)?;
    info!("Google credentials saved to {}", path.display());
    Ok(())
}

pub fn load_credentials(path: &Path) -> Result<ClientCredentials, GoogleApiError> {
    if !path.exists() {
        return Err(GoogleApiError::CredentialsNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ============================================================================
// Token refresh
// ============================================================================

/// Whether the access token is expired (or within 60 seconds of it).
pub fn is_token_expired(token: &GoogleToken) -> bool {
    match &token.expiry {
        None => true,
        Some(expiry_str) => {
            match chrono::DateTime::parse_from_rfc3339(&expiry_str.replace('Z', "+00:00"))
                .or_else(|_| chrono::DateTime::parse_from_rfc3339(expiry_str))
            {
                Ok(expiry) => expiry <= chrono::Utc::now() + chrono::Duration::seconds(60),
                Err(_) => true,
            }
        }
    }
}

/// Exchange the refresh token for a fresh access token and persist it.
pub async fn refresh_access_token(
    http: &reqwest::Client,
    token: &GoogleToken,
    token_file: &Path,
) -> Result<GoogleToken, GoogleApiError> {
    let refresh_token = token
        .refresh_token
        .as_ref()
        .ok_or(GoogleApiError::AuthExpired)?;

    let mut form = vec![
        ("client_id", token.client_id.as_str()),
        ("refresh_token", refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];
    if let Some(secret) = token.client_secret.as_deref() {
        form.push(("client_secret", secret));
    }

    let resp = http.post(&token.token_uri).form(&form).send().await?;
    let status = resp.status();
    let body_text = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(map_refresh_error(status.as_u16(), &body_text));
    }

    let body: serde_json::Value = serde_json::from_str(&body_text)?;
    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| GoogleApiError::RefreshFailed("No access_token in response".into()))?;
    let expires_in = body["expires_in"].as_u64().unwrap_or(3600);
    let expiry = chrono::Utc::now() + chrono::Duration::seconds(expires_in as i64);

    let mut new_token = token.clone();
    new_token.token = access_token.to_string();
    new_token.expiry = Some(expiry.to_rfc3339());

    save_token(token_file, &new_token)?;
    Ok(new_token)
}

fn map_refresh_error(status: u16, body: &str) -> GoogleApiError {
    let lowered = body.to_lowercase();
    if (status == 400 || status == 401)
        && (lowered.contains("invalid_grant") || lowered.contains("token has been expired"))
    {
        return GoogleApiError::AuthExpired;
    }
    GoogleApiError::RefreshFailed(format!("HTTP {}: {}", status, body))
}

// ============================================================================
// Startup credential acquisition
// ============================================================================

/// Google credentials acquired once at startup.
///
/// Resolution order: persisted token as-is if still valid, refreshed token
/// otherwise, and finally the interactive browser consent flow. Failure here
/// is the one fatal error of the whole pipeline: with no usable Google
/// credentials, no calendar or mail source can proceed and nothing can be
/// delivered.
#[derive(Debug, Clone)]
pub struct GoogleAuth {
    access_token: String,
}

impl GoogleAuth {
    pub async fn acquire(config: &AppConfig) -> Result<Self, GoogleApiError> {
        let http = http_client();

        match load_token(&config.token_file) {
            Ok(token) if !is_token_expired(&token) => Ok(Self {
                access_token: token.token,
            }),
            Ok(token) => {
                info!("Refreshing Google API token...");
                match refresh_access_token(&http, &token, &config.token_file).await {
                    Ok(refreshed) => Ok(Self {
                        access_token: refreshed.token,
                    }),
                    Err(e) => {
                        warn!(
                            "Token refresh failed ({}); deleting stale token and re-authorizing",
                            e
                        );
                        if config.token_file.exists() {
                            let _ = std::fs::remove_file(&config.token_file);
                        }
                        Self::consent(config).await
                    }
                }
            }
            Err(_) => {
                info!("Google credentials not found or invalid, starting auth flow...");
                Self::consent(config).await
            }
        }
    }

    async fn consent(config: &AppConfig) -> Result<Self, GoogleApiError> {
        let token = auth::run_consent_flow(&config.credentials_file, &config.token_file).await?;
        Ok(Self {
            access_token: token.token,
        })
    }

    pub fn bearer(&self) -> &str {
        &self.access_token
    }
}

/// Shared reqwest client defaults: JSON APIs with an explicit timeout.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
