use async_trait::async_trait;
use crate::types::Paper;
use crate::Result;

/// Accent color for papers at an even index within their topic batch.
pub const ACCENT_EVEN: &str = "#7c746c";
/// Accent color for papers at an odd index.
pub const ACCENT_ODD: &str = "#ab142c";

/// One chat message worth of display fields for a single paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub color: String,
    pub title: String,
    pub body: String,
    pub link: String,
    pub footer: String,
    pub repo_url: Option<String>,
}

impl Notification {
    /// `index` is the paper's position within its fetched topic batch;
    /// skipped papers still consume an index.
    pub fn for_paper(paper: &Paper, index: usize, body: String) -> Self {
        Self {
            color: accent_for(index).to_string(),
            title: paper.title.clone(),
            body,
            link: paper.url.clone(),
            footer: format!(
                "{} | {} | {}",
                paper.first_author,
                paper.updated_at.date_naive(),
                paper.topic
            ),
            repo_url: paper.repo_url.clone(),
        }
    }
}

pub fn accent_for(index: usize) -> &'static str {
    if index % 2 == 1 {
        ACCENT_ODD
    } else {
        ACCENT_EVEN
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one paper notification; returns the HTTP status code.
    /// Exactly 200 counts as success, anything else is a failure.
    async fn deliver(&self, note: &Notification) -> Result<u16>;

    /// Post a plain text announcement to the channel.
    async fn announce(&self, text: &str) -> Result<u16>;
}
