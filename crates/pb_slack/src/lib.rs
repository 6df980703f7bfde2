use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use pb_core::{Notification, Notifier, Result};

#[derive(Serialize)]
struct AttachmentMessage {
    attachments: Vec<Attachment>,
}

#[derive(Serialize)]
struct Attachment {
    color: String,
    title: String,
    text: String,
    title_link: String,
    footer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    actions: Option<Vec<Action>>,
}

#[derive(Serialize)]
struct Action {
    #[serde(rename = "type")]
    kind: String,
    text: String,
    url: String,
}

#[derive(Serialize)]
struct TextMessage<'a> {
    text: &'a str,
}

/// Posts paper notifications and plain announcements to a Slack
/// incoming webhook.
pub struct SlackNotifier {
    client: Arc<Client>,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            webhook_url: webhook_url.into(),
        }
    }
}

impl fmt::Debug for SlackNotifier {
    // webhook URLs embed a secret, keep them out of logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackNotifier")
            .field("webhook_url", &"<redacted>")
            .finish()
    }
}

fn attachment_for(note: &Notification) -> Attachment {
    Attachment {
        color: note.color.clone(),
        title: note.title.clone(),
        text: note.body.clone(),
        title_link: note.link.clone(),
        footer: note.footer.clone(),
        actions: note.repo_url.as_ref().map(|url| {
            vec![Action {
                kind: "button".to_string(),
                text: ":octocat: Github Repository".to_string(),
                url: url.clone(),
            }]
        }),
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn deliver(&self, note: &Notification) -> Result<u16> {
        let message = AttachmentMessage {
            attachments: vec![attachment_for(note)],
        };
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await?;
        debug!("slack delivery returned {}", response.status());
        Ok(response.status().as_u16())
    }

    async fn announce(&self, text: &str) -> Result<u16> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&TextMessage { text })
            .send()
            .await?;
        Ok(response.status().as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(repo_url: Option<&str>) -> Notification {
        Notification {
            color: "#7c746c".to_string(),
            title: "Scaling Things Up".to_string(),
            body: "번역된 요약".to_string(),
            link: "http://arxiv.org/abs/2303.18181v1".to_string(),
            footer: "Ada Lovelace | 2023-03-31 | LLM".to_string(),
            repo_url: repo_url.map(|u| u.to_string()),
        }
    }

    #[test]
    fn test_attachment_shape() {
        let attachment = attachment_for(&note(Some("https://github.com/ada/scaling")));
        let value = serde_json::to_value(&attachment).unwrap();

        assert_eq!(value["color"], "#7c746c");
        assert_eq!(value["title"], "Scaling Things Up");
        assert_eq!(value["text"], "번역된 요약");
        assert_eq!(value["title_link"], "http://arxiv.org/abs/2303.18181v1");
        assert_eq!(value["footer"], "Ada Lovelace | 2023-03-31 | LLM");
        assert_eq!(value["actions"][0]["type"], "button");
        assert_eq!(value["actions"][0]["text"], ":octocat: Github Repository");
        assert_eq!(value["actions"][0]["url"], "https://github.com/ada/scaling");
    }

    #[test]
    fn test_attachment_without_repo_has_no_actions() {
        let attachment = attachment_for(&note(None));
        let value = serde_json::to_value(&attachment).unwrap();
        assert!(value.get("actions").is_none());
    }
}
