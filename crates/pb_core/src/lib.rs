pub mod error;
pub mod ledger;
pub mod model;
pub mod notify;
pub mod source;
pub mod types;

pub use error::Error;
pub use ledger::Ledger;
pub use model::{LanguageModel, ModelReply};
pub use notify::{Notification, Notifier, ACCENT_EVEN, ACCENT_ODD};
pub use source::PaperSource;
pub use types::{DigestConfig, Paper, TopicQuery, TopicSpec};

pub type Result<T> = std::result::Result<T, Error>;
