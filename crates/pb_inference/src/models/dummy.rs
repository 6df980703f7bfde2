use std::fmt;

use async_trait::async_trait;

use pb_core::{LanguageModel, ModelReply, Result};

/// Offline model for tests and dry runs.
pub struct DummyModel;

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

#[async_trait]
impl LanguageModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn summarize(&self, text: &str) -> Result<ModelReply> {
        // First three sentences, mirroring what the real summary prompt asks for
        let sentences: Vec<&str> = text
            .split(|c| c == '.' || c == '!' || c == '?')
            .filter(|s| !s.trim().is_empty())
            .take(3)
            .collect();
        Ok(ModelReply::Text(sentences.join(". ") + "."))
    }

    async fn translate(&self, text: &str) -> Result<ModelReply> {
        Ok(ModelReply::Text(text.to_string()))
    }
}
