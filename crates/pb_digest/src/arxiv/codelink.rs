use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

/// Papers-with-Code lookup endpoint, keyed by arXiv id.
const CODE_LINK_API_URL: &str = "https://arxiv.paperswithcode.com/api/v0/papers/";

static GITHUB_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https://github\.com/\S+").unwrap());

#[derive(Deserialize)]
struct CodeLinkResponse {
    official: Option<OfficialRepo>,
}

#[derive(Deserialize)]
struct OfficialRepo {
    url: String,
}

/// Resolves a paper's source-code repository: the Papers-with-Code
/// "official" link when one exists, otherwise the first GitHub URL
/// terminated by a period in the abstract.
pub struct CodeLinkClient {
    client: Arc<Client>,
    base_url: String,
}

impl CodeLinkClient {
    pub fn with_client(client: Arc<Client>) -> Self {
        Self {
            client,
            base_url: CODE_LINK_API_URL.to_string(),
        }
    }

    pub async fn resolve(&self, id: &str, abstract_text: &str) -> Option<String> {
        match self.lookup_official(id).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => repo_from_abstract(abstract_text),
            Err(e) => {
                warn!("code link lookup failed for {}: {}", id, e);
                repo_from_abstract(abstract_text)
            }
        }
    }

    async fn lookup_official(&self, id: &str) -> std::result::Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, id))
            .send()
            .await?
            .json::<CodeLinkResponse>()
            .await?;
        Ok(response.official.map(|repo| repo.url))
    }
}

/// First `https://github.com/...` URL in the abstract. The link must be
/// terminated by a period; everything from the last period on is cut.
pub(crate) fn repo_from_abstract(text: &str) -> Option<String> {
    let matched = GITHUB_URL.find(text)?.as_str();
    let path = matched.strip_prefix("https://github.com/")?;
    let cut = path.rfind('.')?;
    if cut == 0 {
        return None;
    }
    Some(format!("https://github.com/{}", &path[..cut]))
}
