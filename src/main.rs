use anyhow::Context;
use tracing::info;

use daily_brief::ai::OpenAiSummarizer;
use daily_brief::assemble::BriefPipeline;
use daily_brief::config::AppConfig;
use daily_brief::google::calendar::GoogleCalendarSource;
use daily_brief::google::gmail::{GmailSender, GmailSource};
use daily_brief::google::GoogleAuth;
use daily_brief::notes::NotesExportSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    daily_brief::setup_logging();
    let started = std::time::Instant::now();
    info!("Starting daily brief generation");

    let config = AppConfig::from_env();

    // The one fatal failure: without Google credentials no source can
    // proceed and nothing can be delivered.
    let auth = GoogleAuth::acquire(&config)
        .await
        .context("could not obtain valid Google credentials")?;

    let calendar = GoogleCalendarSource::new(&auth, &config);
    let mail = GmailSource::new(&auth, &config);
    let tasks = NotesExportSource::new(&config);
    let summarizer = OpenAiSummarizer::from_config(&config);
    let sender = GmailSender::new(&auth);

    let pipeline = BriefPipeline {
        config: &config,
        calendar: &calendar,
        mail: &mail,
        tasks: &tasks,
        summarizer: &summarizer,
        sender: &sender,
    };

    let report = pipeline.run().await?;

    let artifact = report
        .artifact
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "none".to_string());
    info!(
        "Daily brief finished in {:.2}s (artifact: {}, sent: {})",
        started.elapsed().as_secs_f64(),
        artifact,
        report.sent
    );
    Ok(())
}
