pub mod dummy;
pub mod openai;

use std::sync::Arc;

use pb_core::{Error, LanguageModel, Result};

use crate::Config;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Instantiate a model backend by its CLI name.
pub fn create_model(name: &str, config: &Config) -> Result<Arc<dyn LanguageModel>> {
    match name {
        "openai" => Ok(Arc::new(OpenAiModel::new(config)?)),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Inference(format!("unknown model backend: {}", other))),
    }
}
