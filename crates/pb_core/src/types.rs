use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    /// Canonical arXiv id with the revision suffix stripped.
    pub id: String,
    pub title: String,
    pub first_author: String,
    pub authors: Vec<String>,
    pub abstract_text: String,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub url: String,
    pub repo_url: Option<String>,
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DigestConfig {
    /// Cap on results per topic unless the topic overrides it.
    pub max_results: usize,
    /// Re-resolve code links only, skipping notifications entirely.
    #[serde(default)]
    pub update_paper_links: bool,
    pub keywords: BTreeMap<String, TopicSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicSpec {
    pub filters: Vec<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// A topic compiled into an arXiv search expression.
#[derive(Debug, Clone)]
pub struct TopicQuery {
    pub topic: String,
    pub query: String,
    pub max_results: usize,
}

impl DigestConfig {
    pub fn topics(&self) -> Vec<TopicQuery> {
        self.keywords
            .iter()
            .map(|(topic, spec)| TopicQuery {
                topic: topic.clone(),
                query: build_query(&spec.filters),
                max_results: spec.max_results.unwrap_or(self.max_results),
            })
            .collect()
    }
}

/// Multi-word filters become quoted phrases, single terms stay bare,
/// all OR-combined.
pub fn build_query(filters: &[String]) -> String {
    filters
        .iter()
        .map(|filter| {
            if filter.split_whitespace().count() > 1 {
                format!("\"{}\"", filter)
            } else {
                filter.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" OR ")
}
