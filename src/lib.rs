//! daily-brief - assembles and delivers a daily personal briefing.
//!
//! The pipeline pulls from three sources, each of which degrades
//! independently instead of aborting the run:
//! 1. Google Calendar: today's events in the configured zone
//! 2. Gmail: recent inbox messages, metadata only
//! 3. A local folder of OneNote `.docx` exports: open task lines
//!
//! Mail and task text are merged into one corpus, summarized with an OpenAI
//! chat model, and the result is rendered to HTML, written to a local
//! artifact, and sent by email through the Gmail API.
//!
//! # Architecture
//!
//! The system uses:
//! - reqwest for Google Calendar/Gmail and OpenAI HTTP calls
//! - askama for auto-escaped HTML rendering
//! - chrono + chrono-tz for civil-day windowing
//! - Tokio for the async runtime

// Module declarations
pub mod ai;
pub mod assemble;
pub mod config;
pub mod corpus;
pub mod errors;
pub mod google;
pub mod notes;
pub mod source;
pub mod window;

pub use errors::BriefError;

/// Configure structured logging for the CLI.
///
/// Uses a plain fmt layer with an `EnvFilter`, so `RUST_LOG` controls
/// verbosity; defaults to `info`.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
