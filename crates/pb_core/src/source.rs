use async_trait::async_trait;
use crate::types::Paper;
use crate::Result;

/// Upstream paper index, queried once per topic.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Most recent submissions matching `query`, newest first, collapsed
    /// to one entry per canonical id across revisions.
    async fn fetch(&self, topic: &str, query: &str, max_results: usize) -> Result<Vec<Paper>>;
}
