use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use pb_core::{Ledger, Result};

/// In-memory ledger used by tests and dry runs.
#[derive(Default)]
pub struct MemoryLedger {
    seen: RwLock<HashSet<String>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.seen.read().await.contains(id))
    }

    async fn record(&self, id: &str) -> Result<()> {
        self.seen.write().await.insert(id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_ledger() {
        let ledger = MemoryLedger::new();
        assert!(!ledger.contains("2108.09112").await.unwrap());
        ledger.record("2108.09112").await.unwrap();
        assert!(ledger.contains("2108.09112").await.unwrap());
    }
}
