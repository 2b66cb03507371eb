use async_trait::async_trait;
use crate::error::NotifyResult;

/// Destination for rendered messages, one call per message.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn post(&self, text: &str) -> NotifyResult<()>;
}

/// Replaces a raw abstract with a structured summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, title: &str, abstract_text: &str) -> NotifyResult<String>;
    fn name(&self) -> &'static str;
}
