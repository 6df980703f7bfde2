use std::sync::Arc;

use tracing::{info, warn};

use pb_core::{Error, LanguageModel, ModelReply, Notifier, Result};

use crate::retry::RetryPolicy;

/// Placeholder body for papers published without an abstract.
pub const NO_ABSTRACT: &str = "No Abstract found.";

/// Two-stage abstract enrichment: summarize, then translate the summary.
///
/// Each stage gets a bounded number of attempts. A rate-limited reply is
/// announced to the channel and retried after the cooldown; a fatal reply
/// aborts the whole run; anything else falls back to the previous stage's
/// text.
pub struct Enricher {
    model: Arc<dyn LanguageModel>,
    notifier: Arc<dyn Notifier>,
    policy: RetryPolicy,
}

impl Enricher {
    pub fn new(model: Arc<dyn LanguageModel>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            model,
            notifier,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn enrich(&self, abstract_text: &str) -> Result<String> {
        if abstract_text.trim().is_empty() {
            return Ok(NO_ABSTRACT.to_string());
        }

        let summary = match self.run_stage(Stage::Summarize, abstract_text).await? {
            Some(summary) => summary,
            None => return Ok(abstract_text.to_string()),
        };

        match self.run_stage(Stage::Translate, &summary).await? {
            Some(translated) => Ok(translated),
            None => Ok(summary),
        }
    }

    /// Runs one stage to completion. `Ok(None)` means the stage gave up
    /// and the caller falls back to its input text.
    async fn run_stage(&self, stage: Stage, text: &str) -> Result<Option<String>> {
        for attempt in 1..=self.policy.max_attempts {
            let reply = match stage {
                Stage::Summarize => self.model.summarize(text).await,
                Stage::Translate => self.model.translate(text).await,
            };

            match reply {
                Ok(ModelReply::Text(out)) => return Ok(Some(out)),
                Ok(ModelReply::RateLimited) => {
                    let notice = format!(
                        "{} rate limited while {}, cooling down {}s (attempt {}/{})",
                        self.model.name(),
                        stage.verb(),
                        self.policy.cooldown.as_secs(),
                        attempt,
                        self.policy.max_attempts,
                    );
                    warn!("🧊 {}", notice);
                    if let Err(e) = self.notifier.announce(&notice).await {
                        warn!("failed to announce rate limit: {}", e);
                    }
                    tokio::time::sleep(self.policy.cooldown).await;
                }
                Ok(ModelReply::Fatal(reason)) => {
                    let notice = format!(
                        "{} returned a fatal API error while {}: {}. Aborting run.",
                        self.model.name(),
                        stage.verb(),
                        reason,
                    );
                    if let Err(e) = self.notifier.announce(&notice).await {
                        warn!("failed to announce abort: {}", e);
                    }
                    return Err(Error::FatalModel(reason));
                }
                Err(e) => {
                    warn!("{} failed while {}: {}", self.model.name(), stage.verb(), e);
                    return Ok(None);
                }
            }
        }

        info!(
            "gave up {} after {} attempts",
            stage.verb(),
            self.policy.max_attempts
        );
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Summarize,
    Translate,
}

impl Stage {
    fn verb(&self) -> &'static str {
        match self {
            Stage::Summarize => "summarizing",
            Stage::Translate => "translating",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pb_core::Notification;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone)]
    enum Scripted {
        Ok(&'static str),
        RateLimited,
        Fatal(&'static str),
        Error,
    }

    impl Scripted {
        fn reply(&self) -> Result<ModelReply> {
            match self {
                Scripted::Ok(s) => Ok(ModelReply::Text((*s).to_string())),
                Scripted::RateLimited => Ok(ModelReply::RateLimited),
                Scripted::Fatal(r) => Ok(ModelReply::Fatal((*r).to_string())),
                Scripted::Error => Err(Error::Inference("connection reset".to_string())),
            }
        }
    }

    struct StubModel {
        summarize: Scripted,
        translate: Scripted,
        summarize_calls: AtomicU32,
        translate_calls: AtomicU32,
    }

    impl StubModel {
        fn new(summarize: Scripted, translate: Scripted) -> Self {
            Self {
                summarize,
                translate,
                summarize_calls: AtomicU32::new(0),
                translate_calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for StubModel {
        fn name(&self) -> &str {
            "Stub"
        }

        async fn summarize(&self, _text: &str) -> Result<ModelReply> {
            self.summarize_calls.fetch_add(1, Ordering::SeqCst);
            self.summarize.reply()
        }

        async fn translate(&self, _text: &str) -> Result<ModelReply> {
            self.translate_calls.fetch_add(1, Ordering::SeqCst);
            self.translate.reply()
        }
    }

    #[derive(Default)]
    struct StubNotifier {
        announcements: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for StubNotifier {
        async fn deliver(&self, _note: &Notification) -> Result<u16> {
            Ok(200)
        }

        async fn announce(&self, text: &str) -> Result<u16> {
            self.announcements.lock().unwrap().push(text.to_string());
            Ok(200)
        }
    }

    fn enricher(model: Arc<StubModel>, notifier: Arc<StubNotifier>) -> Enricher {
        Enricher::new(model, notifier).with_policy(RetryPolicy::new(5, Duration::from_millis(1)))
    }

    #[tokio::test]
    async fn test_summary_then_translation() {
        let model = Arc::new(StubModel::new(
            Scripted::Ok("a summary"),
            Scripted::Ok("번역된 요약"),
        ));
        let notifier = Arc::new(StubNotifier::default());

        let out = enricher(model.clone(), notifier)
            .enrich("A long abstract.")
            .await
            .unwrap();
        assert_eq!(out, "번역된 요약");
        assert_eq!(model.summarize_calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.translate_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_translate_exhaustion_falls_back_to_summary() {
        let model = Arc::new(StubModel::new(Scripted::Ok("a summary"), Scripted::RateLimited));
        let notifier = Arc::new(StubNotifier::default());

        let out = enricher(model.clone(), notifier.clone())
            .enrich("A long abstract.")
            .await
            .unwrap();
        assert_eq!(out, "a summary");
        assert_eq!(model.translate_calls.load(Ordering::SeqCst), 5);
        assert_eq!(notifier.announcements.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_summarize_failure_falls_back_to_abstract() {
        let model = Arc::new(StubModel::new(Scripted::Error, Scripted::Ok("unused")));
        let notifier = Arc::new(StubNotifier::default());

        let out = enricher(model.clone(), notifier)
            .enrich("The raw abstract.")
            .await
            .unwrap();
        assert_eq!(out, "The raw abstract.");
        assert_eq!(model.summarize_calls.load(Ordering::SeqCst), 1);
        assert_eq!(model.translate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_limit_retry_is_bounded() {
        let model = Arc::new(StubModel::new(Scripted::RateLimited, Scripted::Ok("unused")));
        let notifier = Arc::new(StubNotifier::default());

        let out = enricher(model.clone(), notifier)
            .enrich("The raw abstract.")
            .await
            .unwrap();
        assert_eq!(out, "The raw abstract.");
        assert_eq!(model.summarize_calls.load(Ordering::SeqCst), 5);
        assert_eq!(model.translate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_abstract_skips_model() {
        let model = Arc::new(StubModel::new(Scripted::Ok("unused"), Scripted::Ok("unused")));
        let notifier = Arc::new(StubNotifier::default());

        let out = enricher(model.clone(), notifier).enrich("  ").await.unwrap();
        assert_eq!(out, NO_ABSTRACT);
        assert_eq!(model.summarize_calls.load(Ordering::SeqCst), 0);
        assert_eq!(model.translate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_fatal_reply_aborts_with_announcement() {
        let model = Arc::new(StubModel::new(
            Scripted::Fatal("quota exhausted"),
            Scripted::Ok("unused"),
        ));
        let notifier = Arc::new(StubNotifier::default());

        let err = enricher(model.clone(), notifier.clone())
            .enrich("The raw abstract.")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FatalModel(_)));
        assert_eq!(model.summarize_calls.load(Ordering::SeqCst), 1);

        let announcements = notifier.announcements.lock().unwrap();
        assert_eq!(announcements.len(), 1);
        assert!(announcements[0].contains("Aborting run"));
    }
}
