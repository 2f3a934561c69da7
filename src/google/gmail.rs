//! Gmail API v1 source adapter and send port.
//!
//! The mail source lists recent inbox messages for the configured query and
//! fetches only metadata headers plus the snippet per message; full bodies
//! are never pulled, bounding both cost and payload size. Sending builds a
//! MIME HTML message locally and submits it base64url-encoded.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::{GoogleApiError, GoogleAuth};
use crate::config::AppConfig;
use crate::errors::BriefError;
use crate::source::SourceData;

const MESSAGES_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages";
const SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";

/// One inbox message normalized for the briefing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    pub sender: String,
    pub subject: String,
    pub snippet: String,
}

/// Everything the mail source contributes: display records plus the raw-text
/// corpus blocks handed to summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailBatch {
    pub records: Vec<EmailRecord>,
    pub raw_text: String,
}

#[async_trait]
pub trait MailSource: Send + Sync {
    async fn fetch(&self) -> SourceData<MailBatch>;
}

/// Outbound delivery port.
#[async_trait]
pub trait BriefSender: Send + Sync {
    async fn send(&self, subject: &str, html_body: &str, recipient: &str)
        -> Result<(), BriefError>;
}

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageStub>,
}

#[derive(Debug, Deserialize)]
struct MessageStub {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageDetail {
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    payload: Option<MessagePayload>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
}

// ============================================================================
// Sender normalization
// ============================================================================

/// Reduce a From header to a display-friendly sender.
///
/// `"Jane Doe <jane@x.com>"` prefers the display name; an empty display name
/// falls back to the bare address; a header without angle brackets is used
/// trimmed as-is.
pub fn normalize_sender(raw: &str) -> String {
    match raw.split_once('<') {
        Some((name, rest)) => {
            let name = name.trim().replace('"', "");
            if name.is_empty() {
                rest.split('>').next().unwrap_or(rest).trim().to_string()
            } else {
                name
            }
        }
        None => raw.trim().to_string(),
    }
}

// ============================================================================
// Mail source adapter
// ============================================================================

pub struct GmailSource {
    access_token: String,
    query: String,
    max_emails: u32,
    http: reqwest::Client,
}

impl GmailSource {
    pub fn new(auth: &GoogleAuth, config: &AppConfig) -> Self {
        Self {
            access_token: auth.bearer().to_string(),
            query: config.gmail_query.clone(),
            max_emails: config.max_emails,
            http: super::http_client(),
        }
    }

    async fn list_message_ids(&self) -> Result<Vec<String>, GoogleApiError> {
        let resp = self
            .http
            .get(MESSAGES_URL)
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", self.query.as_str()),
                ("maxResults", &self.max_emails.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GoogleApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let list: MessageListResponse = resp.json().await?;
        Ok(list.messages.into_iter().map(|m| m.id).collect())
    }

    /// Fetch From/Subject headers plus the snippet for one message.
    async fn fetch_metadata(&self, message_id: &str) -> Result<EmailRecord, GoogleApiError> {
        let url = format!("{}/{}", MESSAGES_URL, message_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("format", "metadata"),
                ("metadataHeaders", "From"),
                ("metadataHeaders", "Subject"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GoogleApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let detail: MessageDetail = resp.json().await?;
        let headers = detail
            .payload
            .as_ref()
            .map(|p| p.headers.as_slice())
            .unwrap_or(&[]);

        let header = |name: &str| {
            headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case(name))
                .map(|h| h.value.clone())
        };

        Ok(EmailRecord {
            sender: normalize_sender(&header("From").unwrap_or_else(|| "Unknown Sender".into())),
            subject: header("Subject").unwrap_or_else(|| "No Subject".into()),
            snippet: detail.snippet,
        })
    }

    async fn fetch_batch(&self) -> Result<Vec<EmailRecord>, GoogleApiError> {
        let ids = self.list_message_ids().await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        info!("Found {} emails, fetching details...", ids.len());
        let mut records = Vec::with_capacity(ids.len());
        for id in ids.iter().take(self.max_emails as usize) {
            match self.fetch_metadata(id).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    // One bad message never costs the whole batch
                    warn!("Skipping message {}: {}", id, e);
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl MailSource for GmailSource {
    async fn fetch(&self) -> SourceData<MailBatch> {
        match self.fetch_batch().await {
            Ok(records) if records.is_empty() => {
                info!("No recent emails found matching the criteria");
                SourceData::Empty
            }
            Ok(records) => {
                let raw_text = raw_corpus_text(&records);
                SourceData::Ready(MailBatch { records, raw_text })
            }
            Err(e) => {
                warn!("Mail fetch failed: {}", e);
                log_auth_hint(&e);
                SourceData::Failed(e.to_string())
            }
        }
    }
}

/// Per-record `From:`/`Subject:`/snippet blocks joined by blank lines.
pub fn raw_corpus_text(records: &[EmailRecord]) -> String {
    records
        .iter()
        .map(|r| format!("From: {}\nSubject: {}\n{}", r.sender, r.subject, r.snippet))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn log_auth_hint(error: &GoogleApiError) {
    if let GoogleApiError::Api { status, .. } = error {
        match status {
            401 => warn!("Suggestion: authentication error; try deleting the token file and re-running"),
            403 => warn!("Suggestion: ensure the Gmail API is enabled in your GCP project"),
            _ => {}
        }
    }
}

// ============================================================================
// Send port
// ============================================================================

pub struct GmailSender {
    access_token: String,
    http: reqwest::Client,
}

impl GmailSender {
    pub fn new(auth: &GoogleAuth) -> Self {
        Self {
            access_token: auth.bearer().to_string(),
            http: super::http_client(),
        }
    }
}

#[async_trait]
impl BriefSender for GmailSender {
    async fn send(
        &self,
        subject: &str,
        html_body: &str,
        recipient: &str,
    ) -> Result<(), BriefError> {
        let mime = format!(
            "To: {recipient}\r\nSubject: {subject}\r\nMIME-Version: 1.0\r\n\
             Content-Type: text/html; charset=\"utf-8\"\r\n\r\n{html_body}"
        );
        let raw = URL_SAFE.encode(mime.as_bytes());

        let resp = self
            .http
            .post(SEND_URL)
            .bearer_auth(&self.access_token)
            .json(&json!({ "raw": raw }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            match status.as_u16() {
                401 => warn!("Suggestion: ensure the gmail.send scope was granted; try deleting the token file and re-running"),
                403 => warn!("Suggestion: ensure the Gmail API is enabled and you have permission to send"),
                _ => {}
            }
            let message = resp.text().await.unwrap_or_default();
            return Err(BriefError::GoogleApi(format!(
                "send failed with HTTP {}: {}",
                status, message
            )));
        }

        let body: serde_json::Value = resp.json().await?;
        info!(
            "Email sent successfully to {}. Message ID: {}",
            recipient,
            body["id"].as_str().unwrap_or("unknown")
        );
        Ok(())
    }
}
