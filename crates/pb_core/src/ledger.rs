use async_trait::async_trait;
use crate::Result;

/// Append-only set of paper ids that were already notified.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// True if the paper was notified on a previous run or earlier in the
    /// current one.
    async fn contains(&self, id: &str) -> Result<bool>;

    /// Mark a paper as notified. Only called after a confirmed delivery.
    async fn record(&self, id: &str) -> Result<()>;
}
