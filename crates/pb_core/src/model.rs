use async_trait::async_trait;
use crate::Result;

/// Classified reply from the remote language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    /// Generated text.
    Text(String),
    /// The service is throttling; retry after a cooldown.
    RateLimited,
    /// Unrecoverable API failure; the whole run must abort.
    Fatal(String),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn name(&self) -> &str;

    async fn summarize(&self, text: &str) -> Result<ModelReply>;

    async fn translate(&self, text: &str) -> Result<ModelReply>;
}
