use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use pb_core::{Error, Result};
use pb_digest::{ArxivClient, DigestManager};
use pb_inference::{models::create_model, Config as ModelConfig, Enricher};
use pb_ledger::FileLedger;
use pb_slack::SlackNotifier;

mod config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Topic/keyword configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Ledger of already-notified paper ids
    #[arg(long, default_value = "already_sent/papers.txt")]
    ledger: PathBuf,

    /// Model backend. Available: openai (default), dummy
    #[arg(long, default_value = "openai")]
    model: String,

    /// OpenAI API key; falls back to OPENAI_API_KEY
    #[arg(long)]
    api_key: Option<String>,

    /// Slack incoming webhook URL; falls back to SLACK_WEBHOOK_URL
    #[arg(long)]
    webhook_url: Option<String>,

    /// Target language for the translated summary
    #[arg(long, default_value = "Korean")]
    lang: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config = config::load_config(&cli.config)?;
    info!(
        "🗒️ loaded {} topics from {}",
        config.keywords.len(),
        cli.config.display()
    );

    let webhook_url = cli
        .webhook_url
        .or_else(|| std::env::var("SLACK_WEBHOOK_URL").ok())
        .ok_or_else(|| {
            Error::Config(
                "Slack webhook URL is required (--webhook-url or SLACK_WEBHOOK_URL)".to_string(),
            )
        })?;
    let notifier = Arc::new(SlackNotifier::new(webhook_url));

    let model_config = ModelConfig {
        api_key: cli.api_key.or_else(|| std::env::var("OPENAI_API_KEY").ok()),
        model_name: None,
        target_lang: Some(cli.lang),
    };
    let model = create_model(&cli.model, &model_config)?;
    info!("🧠 model backend initialized (using {})", model.name());

    let ledger = Arc::new(FileLedger::open(&cli.ledger)?);
    let source = Arc::new(ArxivClient::new());
    let enricher = Enricher::new(model, notifier.clone());
    let manager = DigestManager::new(source, ledger, notifier, enricher);

    if config.update_paper_links {
        info!("🔗 update-links mode, notifications skipped");
        manager.update_links(&config).await?;
        return Ok(());
    }

    let report = manager.run(&config).await?;
    info!(
        "✅ run complete: {} fetched, {} skipped, {} delivered",
        report.fetched, report.skipped, report.delivered
    );

    Ok(())
}
