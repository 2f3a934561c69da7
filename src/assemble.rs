//! Briefing assembly and orchestration.
//!
//! `BriefPipeline` runs the strictly linear sequence: resolve window, fetch
//! calendar, fetch mail, fetch tasks, merge corpus, summarize, build the
//! template context, render, persist the local artifact, deliver. A failed
//! source degrades its own section and nothing else, and a failed artifact
//! write never blocks delivery; the local copy is a side channel.

use std::path::PathBuf;

use askama::Template;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::ai::Summarizer;
use crate::config::AppConfig;
use crate::corpus::{merge_corpus, CorpusSection};
use crate::errors::BriefError;
use crate::google::calendar::{CalendarEvent, CalendarSource};
use crate::google::gmail::{BriefSender, EmailRecord, MailBatch, MailSource};
use crate::notes::TaskSource;
use crate::source::SourceData;
use crate::window::{resolve_zone, today_window};

pub const NO_MEETINGS_NOTICE: &str = "No meetings scheduled for today.";
pub const NO_EMAILS_NOTICE: &str = "No relevant emails in the last day.";
pub const NO_TASKS_NOTICE: &str = "No open tasks found in the latest notes export.";

/// Everything the HTML template consumes. Notices carry the rendered form of
/// a source's `Empty` or `Failed` state; rows and notice are mutually
/// exclusive per section.
#[derive(Debug, Template)]
#[template(path = "brief.html")]
pub struct BriefingContext {
    pub date_label: String,
    pub generated_at_label: String,
    pub time_zone_label: String,
    pub calendar_events: Vec<CalendarEvent>,
    pub calendar_notice: Option<String>,
    pub emails: Vec<EmailRecord>,
    pub email_notice: Option<String>,
    pub tasks: Vec<String>,
    pub task_notice: Option<String>,
    pub summary: String,
}

/// Build the template context from the per-source outcomes.
///
/// This is where each `SourceData` variant gets its presentation: data rows
/// when `Ready`, the fixed empty-state notice when `Empty`, and a labeled
/// error notice when `Failed`.
pub fn build_context(
    config: &AppConfig,
    now: DateTime<Utc>,
    calendar: SourceData<Vec<CalendarEvent>>,
    mail: SourceData<MailBatch>,
    tasks: SourceData<Vec<String>>,
    summary: String,
) -> BriefingContext {
    let tz = resolve_zone(&config.time_zone);
    let now_local = now.with_timezone(&tz);

    let (calendar_events, calendar_notice) = match calendar {
        SourceData::Ready(events) => (events, None),
        SourceData::Empty => (Vec::new(), Some(NO_MEETINGS_NOTICE.to_string())),
        SourceData::Failed(reason) => (
            Vec::new(),
            Some(format!("Error fetching calendar events: {}", reason)),
        ),
    };

    let (emails, email_notice) = match mail {
        SourceData::Ready(batch) => (batch.records, None),
        SourceData::Empty => (Vec::new(), Some(NO_EMAILS_NOTICE.to_string())),
        SourceData::Failed(reason) => {
            (Vec::new(), Some(format!("Error fetching emails: {}", reason)))
        }
    };

    let (tasks, task_notice) = match tasks {
        SourceData::Ready(tasks) => (tasks, None),
        SourceData::Empty => (Vec::new(), Some(NO_TASKS_NOTICE.to_string())),
        SourceData::Failed(reason) => (
            Vec::new(),
            Some(format!("Error reading notes export: {}", reason)),
        ),
    };

    BriefingContext {
        date_label: now_local.format("%A, %B %d, %Y").to_string(),
        generated_at_label: now_local.format("%I:%M %p").to_string(),
        time_zone_label: now_local.format("%Z").to_string(),
        calendar_events,
        calendar_notice,
        emails,
        email_notice,
        tasks,
        task_notice,
        summary,
    }
}

/// Outcome of one pipeline run. `artifact` is `None` when the local copy
/// could not be written.
#[derive(Debug)]
pub struct RunReport {
    pub artifact: Option<PathBuf>,
    pub sent: bool,
}

pub struct BriefPipeline<'a> {
    pub config: &'a AppConfig,
    pub calendar: &'a dyn CalendarSource,
    pub mail: &'a dyn MailSource,
    pub tasks: &'a dyn TaskSource,
    pub summarizer: &'a dyn Summarizer,
    pub sender: &'a dyn BriefSender,
}

impl BriefPipeline<'_> {
    pub async fn run(&self) -> Result<RunReport, BriefError> {
        let now = Utc::now();
        let window = today_window(&self.config.time_zone);

        info!("--- Fetching data ---");
        let calendar = self.calendar.fetch(&window).await;
        let mail = self.mail.fetch().await;
        let tasks = self.tasks.fetch();

        let task_text = tasks.ready().map(|lines| lines.join("\n"));
        let corpus = merge_corpus(&[
            CorpusSection {
                label: "Emails",
                body: mail.ready().map(|batch| batch.raw_text.as_str()),
            },
            CorpusSection {
                label: "Tasks",
                body: task_text.as_deref(),
            },
        ]);

        info!("--- Summarizing ---");
        let summary = self.summarizer.summarize(&corpus).await;

        info!("--- Composing briefing ---");
        let context = build_context(self.config, now, calendar, mail, tasks, summary);
        let subject = format!("Daily Brief - {}", context.date_label);
        let html = context.render()?;

        let artifact = match std::fs::write(&self.config.output_file, &html) {
            Ok(()) => {
                info!(
                    "HTML output saved locally to {}",
                    self.config.output_file.display()
                );
                Some(self.config.output_file.clone())
            }
            Err(e) => {
                warn!(
                    "Failed to save HTML output to {}: {}",
                    self.config.output_file.display(),
                    e
                );
                None
            }
        };

        let sent = match &self.config.recipient {
            None => {
                warn!("RECIPIENT_EMAIL not configured, skipping delivery");
                false
            }
            Some(recipient) => match self.sender.send(&subject, &html, recipient).await {
                Ok(()) => true,
                Err(e) => {
                    error!("Email delivery failed: {}", e);
                    false
                }
            },
        };

        Ok(RunReport { artifact, sent })
    }
}
