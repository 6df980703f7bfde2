use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use feed_rs::model::Entry;
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use pb_core::{Error, Paper, PaperSource, Result};

pub mod codelink;

use codelink::CodeLinkClient;

const EXPORT_API_URL: &str = "http://export.arxiv.org/api/query";

/// Queries the arXiv export API for recent submissions matching a
/// keyword expression, newest first.
pub struct ArxivClient {
    client: Arc<Client>,
    base_url: String,
    codelink: CodeLinkClient,
}

impl ArxivClient {
    pub fn new() -> Self {
        let client = Arc::new(Client::new());
        Self {
            codelink: CodeLinkClient::with_client(client.clone()),
            client,
            base_url: EXPORT_API_URL.to_string(),
        }
    }

    fn query_url(&self, query: &str, max_results: usize) -> Result<Url> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("search_query", query),
                ("sortBy", "submittedDate"),
                ("sortOrder", "descending"),
                ("max_results", &max_results.to_string()),
            ],
        )
        .map_err(|e| Error::Fetch(format!("invalid query URL: {}", e)))
    }

    async fn paper_from_entry(&self, topic: &str, entry: &Entry) -> Result<Paper> {
        let short_id = short_id(&entry.id)?;
        let id = strip_revision(short_id).to_string();

        let title = entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default();
        let abstract_text = entry
            .summary
            .as_ref()
            .map(|s| s.content.replace('\n', " "))
            .unwrap_or_default();
        let authors: Vec<String> = entry.authors.iter().map(|a| a.name.clone()).collect();
        let first_author = authors
            .first()
            .cloned()
            .ok_or_else(|| Error::Parse(format!("entry {} has no authors", short_id)))?;

        let published_at = entry.published.unwrap_or_else(Utc::now);
        let updated_at = entry.updated.unwrap_or(published_at);

        let repo_url = self.codelink.resolve(&id, &abstract_text).await;

        Ok(Paper {
            id,
            title,
            first_author,
            authors,
            abstract_text,
            published_at,
            updated_at,
            url: entry.id.clone(),
            repo_url,
            topic: topic.to_string(),
        })
    }
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn fetch(&self, topic: &str, query: &str, max_results: usize) -> Result<Vec<Paper>> {
        let url = self.query_url(query, max_results)?;
        let response = self.client.get(url).send().await?;
        let bytes = response.bytes().await?;
        let feed = feed_rs::parser::parse(bytes.as_ref())
            .map_err(|e| Error::Fetch(format!("unparseable arXiv feed: {}", e)))?;

        if feed.entries.is_empty() {
            return Err(Error::Fetch(format!("empty result page for query: {}", query)));
        }

        let mut papers: Vec<Paper> = Vec::new();
        for entry in &feed.entries {
            match self.paper_from_entry(topic, entry).await {
                Ok(paper) => {
                    info!(
                        "📄 {} | {} | {}",
                        paper.updated_at.date_naive(),
                        paper.title,
                        paper.first_author
                    );
                    upsert(&mut papers, paper);
                }
                Err(e) => warn!("skipping malformed entry: {}", e),
            }
        }

        Ok(papers)
    }
}

/// Later revisions of the same paper replace the earlier entry in place,
/// keeping the batch ordered newest first.
fn upsert(papers: &mut Vec<Paper>, paper: Paper) {
    if let Some(existing) = papers.iter_mut().find(|p| p.id == paper.id) {
        *existing = paper;
    } else {
        papers.push(paper);
    }
}

/// `http://arxiv.org/abs/2108.09112v1` -> `2108.09112v1`
fn short_id(entry_id: &str) -> Result<&str> {
    entry_id
        .split_once("/abs/")
        .map(|(_, id)| id)
        .ok_or_else(|| Error::Parse(format!("entry id without /abs/ segment: {}", entry_id)))
}

/// `2108.09112v2` -> `2108.09112`; ids without a trailing revision pass
/// through unchanged.
fn strip_revision(id: &str) -> &str {
    if let Some(pos) = id.rfind('v') {
        let suffix = &id[pos + 1..];
        if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
            return &id[..pos];
        }
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_strip_revision() {
        assert_eq!(strip_revision("2108.09112v1"), "2108.09112");
        assert_eq!(strip_revision("2108.09112v12"), "2108.09112");
        assert_eq!(strip_revision("2108.09112"), "2108.09112");
        assert_eq!(strip_revision("cs/0112017v2"), "cs/0112017");
        assert_eq!(strip_revision("cs/0112017"), "cs/0112017");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("http://arxiv.org/abs/2108.09112v1").unwrap(), "2108.09112v1");
        assert_eq!(short_id("http://arxiv.org/abs/cs/0112017v1").unwrap(), "cs/0112017v1");
        assert!(short_id("http://arxiv.org/2108.09112v1").is_err());
    }

    #[test]
    fn test_query_url_encodes_expression() {
        let client = ArxivClient::new();
        let url = client
            .query_url("\"large language model\" OR LLM", 7)
            .unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("sortBy=submittedDate"));
        assert!(query.contains("sortOrder=descending"));
        assert!(query.contains("max_results=7"));
        assert!(query.contains("search_query="));
    }

    #[test]
    fn test_upsert_replaces_revision_in_place() {
        let stamp = Utc.with_ymd_and_hms(2023, 3, 30, 0, 0, 0).unwrap();
        let mk = |id: &str, title: &str| Paper {
            id: id.to_string(),
            title: title.to_string(),
            first_author: "Ada Lovelace".to_string(),
            authors: vec!["Ada Lovelace".to_string()],
            abstract_text: String::new(),
            published_at: stamp,
            updated_at: stamp,
            url: format!("http://arxiv.org/abs/{}", id),
            repo_url: None,
            topic: "LLM".to_string(),
        };

        let mut papers = Vec::new();
        upsert(&mut papers, mk("2303.18181", "first seen"));
        upsert(&mut papers, mk("2304.00001", "other paper"));
        upsert(&mut papers, mk("2303.18181", "revised"));

        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].id, "2303.18181");
        assert_eq!(papers[0].title, "revised");
        assert_eq!(papers[1].id, "2304.00001");
    }
}
