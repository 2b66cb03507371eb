pub mod models;

use async_trait::async_trait;
use common::{NotifyError, NotifyResult, Summarizer};
use models::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use reqwest::Client;
use tracing::{info, warn};

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

const SYSTEM_PROMPT: &str = "Generate a brief and simple summary of the document \
according to these formats:\n\
* Introduction:\n\
* Challenges:\n\
* Methods:\n\
* Novelties:\n\
* Results:\n\
* Performances:\n\
* Limitations:\n\
* Discussion:\n";

pub struct OpenAiClient {
    http_client: Client,
    api_key: String,
    url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_url(api_key, OPENAI_CHAT_URL)
    }

    pub fn with_url(api_key: &str, url: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.to_string(),
            url: url.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    async fn complete(&self, user_message: &str) -> NotifyResult<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        };

        let res = self
            .http_client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(NotifyError::Api(format!("Request failed: {} - {}", status, text)));
        }

        let resp: ChatCompletionResponse = res.json().await?;
        let content = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            warn!("Received empty completion from {}", self.model);
            return Err(NotifyError::Api("empty completion".to_string()));
        }
        Ok(content)
    }
}

#[async_trait]
impl Summarizer for OpenAiClient {
    async fn summarize(&self, title: &str, abstract_text: &str) -> NotifyResult<String> {
        info!("Summarizing paper: {}", title);
        self.complete(&format!("Title: {}\nAbstract: {}", title, abstract_text))
            .await
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}
