pub mod format;

use arxiv::{ArxivClient, Filter, PaperRecord, PaperSource, SearchRequest};
use common::{Config, MessageSink, NotifyError, NotifyResult, Params, Summarizer, WebhookClient};
use openai::OpenAiClient;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use tracing::{error, info, warn};

pub use format::{raw_abstract, MessageFormatter};

/// What a run did, logged at the end and returned to callers that want it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub papers_found: usize,
    pub messages_sent: usize,
    pub messages_failed: usize,
}

/// Status returned by the invocation entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationStatus {
    pub status_code: u16,
    pub body: String,
}

impl InvocationStatus {
    pub fn completed() -> Self {
        Self {
            status_code: 200,
            body: "Process completed.".to_string(),
        }
    }
}

pub struct ArxivNotifier {
    source: Box<dyn PaperSource>,
    sink: Box<dyn MessageSink>,
    summarizer: Option<Box<dyn Summarizer>>,
    formatter: MessageFormatter,
    max_results: usize,
}

impl ArxivNotifier {
    pub fn new(config: &Config) -> Self {
        let summarizer = config
            .openai_api_key
            .as_deref()
            .map(|key| Box::new(OpenAiClient::new(key)) as Box<dyn Summarizer>);

        Self::with_parts(
            Box::new(ArxivClient::new()),
            Box::new(WebhookClient::new(&config.webhook_url, config.webhook_timeout)),
            summarizer,
            MessageFormatter::new(config.style),
            config.max_results,
        )
    }

    pub fn with_parts(
        source: Box<dyn PaperSource>,
        sink: Box<dyn MessageSink>,
        summarizer: Option<Box<dyn Summarizer>>,
        formatter: MessageFormatter,
        max_results: usize,
    ) -> Self {
        Self {
            source,
            sink,
            summarizer,
            formatter,
            max_results,
        }
    }

    /// Searches once, then posts the header followed by one message per paper in
    /// the order the search returned them. A search failure aborts the run; a
    /// failed post is logged and the next message is still sent.
    pub async fn run(&self, filter: &Filter) -> NotifyResult<RunReport> {
        let query = filter.query();
        let request = SearchRequest::new(query.clone(), self.max_results);

        let records = match self.source.search(&request).await {
            Ok(records) => records,
            Err(e) => {
                error!("arXiv search failed, aborting run: {}", e);
                return Err(e);
            }
        };
        info!("Found {} papers for {}", records.len(), filter.day_stamp());

        let mut report = RunReport {
            papers_found: records.len(),
            ..RunReport::default()
        };

        let header = self
            .formatter
            .build_header(filter.day(), &filter.month_abbrev(), &query, records.len());
        self.deliver(&header, &mut report).await;

        for record in &records {
            let abstract_text = self.abstract_for(record).await;
            let block = self.formatter.build_paper_block(record, &abstract_text);
            self.deliver(&block, &mut report).await;
        }

        info!(
            "Run finished. Papers: {}, sent: {}, failed: {}",
            report.papers_found, report.messages_sent, report.messages_failed
        );
        Ok(report)
    }

    async fn deliver(&self, text: &str, report: &mut RunReport) {
        match self.sink.post(text).await {
            Ok(()) => report.messages_sent += 1,
            Err(e) => {
                warn!("Failed to post message, continuing: {}", e);
                report.messages_failed += 1;
            }
        }
    }

    async fn abstract_for(&self, record: &PaperRecord) -> String {
        let Some(summarizer) = &self.summarizer else {
            return raw_abstract(record);
        };

        match summarizer
            .summarize(&record.title, &record.normalized_summary())
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    "{} summary failed for '{}', using raw abstract: {}",
                    summarizer.name(),
                    record.title,
                    e
                );
                raw_abstract(record)
            }
        }
    }
}

/// The day before `now`, in UTC.
pub fn previous_utc_day(now: OffsetDateTime) -> NotifyResult<Date> {
    now.to_offset(time::UtcOffset::UTC)
        .date()
        .previous_day()
        .ok_or_else(|| NotifyError::InvalidFilter("no calendar day precedes the current date".to_string()))
}

pub fn filter_from_config(config: &Config) -> NotifyResult<Filter> {
    let day = match config.target_day {
        Some(day) => day,
        None => previous_utc_day(OffsetDateTime::now_utc())?,
    };
    Filter::new(config.keywords.clone(), config.categories.clone(), day)
}

pub async fn run_with_config(config: &Config) -> NotifyResult<InvocationStatus> {
    let filter = filter_from_config(config)?;
    ArxivNotifier::new(config).run(&filter).await?;
    Ok(InvocationStatus::completed())
}

/// Entry point taking the configuration bag directly.
pub async fn invoke(params: Params) -> NotifyResult<InvocationStatus> {
    run_with_config(&Config::from_params(params)).await
}

pub async fn run_arxiv_notifier() -> anyhow::Result<InvocationStatus> {
    let _ = dotenv::dotenv();
    let config = Config::from_env()?;
    run_with_config(&config).await.map_err(|e| anyhow::anyhow!(e))
}
