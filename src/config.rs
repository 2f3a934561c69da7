use std::env;
use std::path::PathBuf;

/// Immutable run configuration, read from the environment once at startup
/// and passed explicitly into every adapter.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IANA zone the briefing day is anchored to.
    pub time_zone: String,
    /// Gmail search query for the mail source.
    pub gmail_query: String,
    /// Cap on how many messages the mail source will process.
    pub max_emails: u32,
    /// Folder holding OneNote `.docx` exports; tasks come from the newest one.
    pub notes_export_folder: Option<PathBuf>,
    /// Case-insensitive prefix marking a task as completed.
    pub done_marker: String,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub recipient: Option<String>,
    /// Person whose action items get their own summary section.
    pub primary_user: String,
    /// Other people whose near-term action items are surfaced.
    pub colleagues: String,
    /// Where the rendered HTML is always written, independent of delivery.
    pub output_file: PathBuf,
    pub credentials_file: PathBuf,
    pub token_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            time_zone: env::var("BRIEF_TIMEZONE")
                .unwrap_or_else(|_| "America/New_York".to_string()),
            gmail_query: env::var("GMAIL_QUERY")
                .unwrap_or_else(|_| "newer_than:1d in:inbox -label:trash".to_string()),
            max_emails: env::var("MAX_EMAILS_TO_PROCESS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            notes_export_folder: env::var("NOTES_EXPORT_FOLDER").ok().map(PathBuf::from),
            done_marker: env::var("NOTES_DONE_MARKER").unwrap_or_else(|_| "DONE".to_string()),
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            openai_model: env::var("OPENAI_MODEL").ok(),
            recipient: env::var("RECIPIENT_EMAIL").ok(),
            primary_user: env::var("BRIEF_PRIMARY_USER")
                .unwrap_or_else(|_| "Seth Benkov".to_string()),
            colleagues: env::var("BRIEF_COLLEAGUES").unwrap_or_else(|_| "Kevin or Trent".to_string()),
            output_file: env::var("BRIEF_OUTPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("daily_brief_output.html")),
            credentials_file: env::var("GOOGLE_CREDENTIALS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("credentials.json")),
            token_file: env::var("GOOGLE_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("token.json")),
        }
    }
}
