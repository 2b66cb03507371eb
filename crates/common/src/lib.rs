pub mod config;
pub mod error;
pub mod sink;
pub mod webhook_client;

pub use config::{Config, LineSpacing, MessageStyle, Params};
pub use error::{NotifyError, NotifyResult};
pub use sink::{MessageSink, Summarizer};
pub use webhook_client::WebhookClient;
