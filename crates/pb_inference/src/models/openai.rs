use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use pb_core::{Error, LanguageModel, ModelReply, Result};

use crate::Config;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TARGET_LANG: &str = "Korean";

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

pub struct OpenAiModel {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    model: String,
    target_lang: String,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| Error::Inference("OpenAI API key is required".to_string()))?;
        Ok(Self {
            client: Arc::new(Client::new()),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: config
                .model_name
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            target_lang: config
                .target_lang
                .clone()
                .unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string()),
        })
    }

    async fn request(&self, messages: Vec<ChatMessage>) -> Result<ModelReply> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(ModelReply::RateLimited);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(ModelReply::Fatal(format!(
                "API rejected credentials ({})",
                status
            )));
        }
        if !status.is_success() {
            return Err(Error::Inference(format!(
                "chat completion failed with status {}",
                status
            )));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::Inference("chat completion returned no choices".to_string()))?;
        Ok(ModelReply::Text(content))
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("target_lang", &self.target_lang)
            .finish()
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn summarize(&self, text: &str) -> Result<ModelReply> {
        let prompt = format!(
            "Please summarize the following text into 3 sentences and extract \
             only the essentials of what the paper authors do: {}",
            text
        );
        self.request(vec![
            ChatMessage {
                role: "system".to_string(),
                content: "You are a helpful research paper assistant that writes \
                          concise summaries."
                    .to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: prompt,
            },
        ])
        .await
    }

    async fn translate(&self, text: &str) -> Result<ModelReply> {
        self.request(vec![
            ChatMessage {
                role: "system".to_string(),
                content: format!(
                    "You are a helpful assistant that translates English to {}.",
                    self.target_lang
                ),
            },
            ChatMessage {
                role: "user".to_string(),
                content: text.to_string(),
            },
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_requires_api_key() {
        let result = OpenAiModel::new(&Config::default());
        assert!(result.is_err());

        let result = OpenAiModel::new(&Config {
            api_key: Some("test-key".to_string()),
            ..Config::default()
        });
        assert!(result.is_ok());
        assert_eq!(result.unwrap().name(), "OpenAI");
    }

    #[test]
    fn test_defaults_and_overrides() {
        let model = OpenAiModel::new(&Config {
            api_key: Some("test-key".to_string()),
            model_name: None,
            target_lang: None,
        })
        .unwrap();
        assert_eq!(model.model, DEFAULT_MODEL);
        assert_eq!(model.target_lang, DEFAULT_TARGET_LANG);

        let model = OpenAiModel::new(&Config {
            api_key: Some("test-key".to_string()),
            model_name: Some("gpt-4".to_string()),
            target_lang: Some("Spanish".to_string()),
        })
        .unwrap();
        assert_eq!(model.model, "gpt-4");
        assert_eq!(model.target_lang, "Spanish");
    }
}
