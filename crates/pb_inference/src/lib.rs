pub mod enrich;
pub mod models;
pub mod retry;

pub use enrich::{Enricher, NO_ABSTRACT};
pub use models::create_model;
pub use retry::RetryPolicy;

/// Settings shared by the remote model backends.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub target_lang: Option<String>,
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::{Config, Enricher, RetryPolicy};
    pub use pb_core::{LanguageModel, ModelReply, Result};
}
