use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Metadata error: {0}")]
    Parse(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Fatal model API error: {0}")]
    FatalModel(String),

    #[error("Notify error: {0}")]
    Notify(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Transient upstream fetch failures; the orchestrator retries these
    /// with a fixed cooldown instead of failing the topic.
    pub fn is_transient_fetch(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
