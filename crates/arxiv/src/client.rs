use async_trait::async_trait;
use common::{NotifyError, NotifyResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Client;
use serde::Deserialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::models::PaperRecord;

pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

// `%` is left alone so the pre-encoded parentheses of the query pass through.
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'#')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b']')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriterion {
    Relevance,
    LastUpdatedDate,
    #[default]
    SubmittedDate,
}

impl SortCriterion {
    pub fn as_str(self) -> &'static str {
        match self {
            SortCriterion::Relevance => "relevance",
            SortCriterion::LastUpdatedDate => "lastUpdatedDate",
            SortCriterion::SubmittedDate => "submittedDate",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub sort_by: SortCriterion,
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(query: String, max_results: usize) -> Self {
        Self {
            query,
            sort_by: SortCriterion::SubmittedDate,
            max_results,
        }
    }
}

/// Executes a search and returns records newest first, in the order the backend gave them.
#[async_trait]
pub trait PaperSource: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> NotifyResult<Vec<PaperRecord>>;
}

#[derive(Clone)]
pub struct ArxivClient {
    client: Client,
    base_url: String,
}

impl ArxivClient {
    pub fn new() -> Self {
        Self::with_base_url(ARXIV_API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
        }
    }

    pub fn search_url(&self, request: &SearchRequest) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy={}&sortOrder=descending",
            self.base_url,
            utf8_percent_encode(&request.query, QUERY_VALUE),
            request.max_results,
            request.sort_by.as_str()
        )
    }
}

impl Default for ArxivClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn search(&self, request: &SearchRequest) -> NotifyResult<Vec<PaperRecord>> {
        let url = self.search_url(request);
        info!("Querying arXiv: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api(format!("arXiv request failed: {} - {}", status, text)));
        }

        let body = response.text().await?;
        debug!("arXiv response: {} bytes", body.len());

        let records = parse_feed(&body)?;
        info!("arXiv returned {} entries", records.len());
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@title", default)]
    title: Option<String>,
    #[serde(rename = "@type", default)]
    media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(rename = "@term")]
    term: String,
}

/// Parses an arXiv Atom feed. The API reports query errors as a single entry
/// whose id points at `/api/errors`; that is surfaced as [`NotifyError::Api`].
pub fn parse_feed(xml: &str) -> NotifyResult<Vec<PaperRecord>> {
    let feed: Feed = quick_xml::de::from_str(xml)
        .map_err(|e| NotifyError::Parse(format!("Failed to parse arXiv feed: {}", e)))?;

    feed.entries.into_iter().map(Entry::into_record).collect()
}

impl Entry {
    fn into_record(self) -> NotifyResult<PaperRecord> {
        if self.id.contains("/api/errors") {
            return Err(NotifyError::Api(format!(
                "arXiv rejected the query: {}",
                self.summary.trim()
            )));
        }

        let published = self
            .published
            .as_deref()
            .ok_or_else(|| NotifyError::Parse(format!("entry {} has no published date", self.id)))?;
        let published = OffsetDateTime::parse(published.trim(), &Rfc3339)
            .map_err(|e| NotifyError::Parse(format!("bad published date '{}': {}", published, e)))?;

        let pdf_url = self
            .links
            .iter()
            .find(|l| {
                l.title.as_deref() == Some("pdf") || l.media_type.as_deref() == Some("application/pdf")
            })
            .map(|l| l.href.clone());

        Ok(PaperRecord {
            title: self.title.split_whitespace().collect::<Vec<_>>().join(" "),
            authors: self.authors.into_iter().map(|a| a.name.trim().to_string()).collect(),
            published,
            entry_id: self.id.trim().to_string(),
            pdf_url,
            categories: self.categories.into_iter().map(|c| c.term).collect(),
            summary: self.summary.trim().to_string(),
        })
    }
}
