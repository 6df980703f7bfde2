use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tracing::{info, warn};

use pb_core::{
    DigestConfig, Ledger, Notification, Notifier, Paper, PaperSource, Result, TopicQuery,
};
use pb_inference::Enricher;

/// Cooldown before re-fetching a topic after a transient upstream error.
const FETCH_COOLDOWN: Duration = Duration::from_secs(300);

/// Per-run outcome accumulated while topics are processed.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Status code of every delivery attempt, in order. A transport
    /// failure is recorded as status 0.
    pub statuses: Vec<u16>,
    pub fetched: usize,
    pub skipped: usize,
    pub delivered: usize,
}

impl RunReport {
    /// True if any delivery was attempted this run, successful or not.
    pub fn attempted(&self) -> bool {
        !self.statuses.is_empty()
    }
}

/// Drives one full run: fetch per topic, dedup against the ledger,
/// enrich, deliver, record.
pub struct DigestManager {
    source: Arc<dyn PaperSource>,
    ledger: Arc<dyn Ledger>,
    notifier: Arc<dyn Notifier>,
    enricher: Enricher,
    fetch_cooldown: Duration,
}

impl DigestManager {
    pub fn new(
        source: Arc<dyn PaperSource>,
        ledger: Arc<dyn Ledger>,
        notifier: Arc<dyn Notifier>,
        enricher: Enricher,
    ) -> Self {
        Self {
            source,
            ledger,
            notifier,
            enricher,
            fetch_cooldown: FETCH_COOLDOWN,
        }
    }

    pub fn with_fetch_cooldown(mut self, cooldown: Duration) -> Self {
        self.fetch_cooldown = cooldown;
        self
    }

    pub async fn run(&self, config: &DigestConfig) -> Result<RunReport> {
        let mut report = RunReport::default();

        info!("📡 GET daily papers begin");
        for topic in config.topics() {
            info!("topic = {} query = {}", topic.topic, topic.query);
            self.run_topic(&topic, &mut report).await?;
        }
        info!("📡 GET daily papers end");

        let now = Local::now();
        let summary = if report.attempted() {
            format!(
                "{}'s {}h is Done ! Enjoy with your papers :arxiv:",
                now.format("%Y-%m-%d"),
                now.format("%H")
            )
        } else {
            format!(
                "Nothing to share {}'s {}h :arxiv:",
                now.format("%Y-%m-%d"),
                now.format("%H")
            )
        };
        if let Err(e) = self.notifier.announce(&summary).await {
            warn!("failed to announce run summary: {}", e);
        }

        Ok(report)
    }

    /// Re-resolve code links only; no enrichment, no delivery, no ledger
    /// writes.
    pub async fn update_links(&self, config: &DigestConfig) -> Result<()> {
        for topic in config.topics() {
            let papers = self.fetch_topic(&topic).await?;
            for paper in &papers {
                match &paper.repo_url {
                    Some(repo) => info!("🔗 {} -> {}", paper.id, repo),
                    None => info!("🔗 {} -> no code link found", paper.id),
                }
            }
        }
        Ok(())
    }

    async fn run_topic(&self, topic: &TopicQuery, report: &mut RunReport) -> Result<()> {
        let papers = self.fetch_topic(topic).await?;
        report.fetched += papers.len();

        for (index, paper) in papers.iter().enumerate() {
            if self.ledger.contains(&paper.id).await? {
                info!("⏭️ already sent: {}", paper.id);
                report.skipped += 1;
                continue;
            }

            let body = self.enricher.enrich(&paper.abstract_text).await?;
            let note = Notification::for_paper(paper, index, body);

            let status = match self.notifier.deliver(&note).await {
                Ok(status) => status,
                Err(e) => {
                    warn!("delivery failed for {}: {}", paper.id, e);
                    0
                }
            };
            report.statuses.push(status);

            if status == 200 {
                self.ledger.record(&paper.id).await?;
                report.delivered += 1;
                info!("💬 delivered {}", paper.id);
            } else {
                warn!(
                    "delivery returned status {} for {}, will retry next run",
                    status, paper.id
                );
            }
        }

        Ok(())
    }

    /// Transient upstream errors retry forever with a fixed cooldown,
    /// scoped to this topic.
    async fn fetch_topic(&self, topic: &TopicQuery) -> Result<Vec<Paper>> {
        loop {
            match self
                .source
                .fetch(&topic.topic, &topic.query, topic.max_results)
                .await
            {
                Ok(papers) => return Ok(papers),
                Err(e) if e.is_transient_fetch() => {
                    warn!(
                        "fetch failed for topic {} ({}), retrying in {}s",
                        topic.topic,
                        e,
                        self.fetch_cooldown.as_secs()
                    );
                    tokio::time::sleep(self.fetch_cooldown).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
