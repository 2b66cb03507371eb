use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{NotifyError, NotifyResult};
use crate::sink::MessageSink;

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts `{"text": ...}` JSON bodies to a chat webhook.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    webhook_url: String,
    timeout: Duration,
}

impl WebhookClient {
    pub fn new(webhook_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.to_string(),
            timeout,
        }
    }

    pub async fn post_text(&self, text: &str) -> NotifyResult<()> {
        debug!("Posting {} bytes to webhook", text.len());

        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(self.timeout)
            .json(&WebhookPayload { text })
            .send()
            .await?;

        if response.status().is_success() {
            info!("Webhook accepted message ({} bytes)", text.len());
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(NotifyError::Api(format!(
                "Webhook rejected message: {} - {}",
                status, error_text
            )))
        }
    }
}

#[async_trait]
impl MessageSink for WebhookClient {
    async fn post(&self, text: &str) -> NotifyResult<()> {
        self.post_text(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_post_sends_text_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/hook")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({"text": "Title: x\n\n"})))
            .with_status(200)
            .create_async()
            .await;

        let client = WebhookClient::new(&format!("{}/hook", server.url()), Duration::from_secs(5));
        client.post("Title: x\n\n").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_reports_rejected_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/hook")
            .with_status(404)
            .with_body("no_service")
            .create_async()
            .await;

        let client = WebhookClient::new(&format!("{}/hook", server.url()), Duration::from_secs(5));
        let err = client.post("hello").await.unwrap_err();

        assert!(matches!(err, NotifyError::Api(ref msg) if msg.contains("no_service")));
    }
}
