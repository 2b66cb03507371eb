use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use time::macros::format_description;
use time::Date;

pub const DEFAULT_MAX_RESULTS: usize = 100;
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 5;

/// Line terminator used between the lines of a rendered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSpacing {
    Single,
    #[default]
    Double,
}

impl LineSpacing {
    pub fn newline(self) -> &'static str {
        match self {
            LineSpacing::Single => "\n",
            LineSpacing::Double => "\n\n",
        }
    }
}

impl FromStr for LineSpacing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(LineSpacing::Single),
            "double" => Ok(LineSpacing::Double),
            other => anyhow::bail!("unknown line spacing '{}', expected 'single' or 'double'", other),
        }
    }
}

/// Selects the output template of the header and per-paper messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageStyle {
    pub include_pdf_link: bool,
    pub spacing: LineSpacing,
}

/// The configuration bag accepted by the invocation entry point.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Params {
    pub webhook_url: String,
    pub keywords: String,
    pub categories: String,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub webhook_url: String,
    pub keywords: Vec<String>,
    pub categories: Vec<String>,
    pub openai_api_key: Option<String>,
    pub target_day: Option<Date>,
    pub max_results: usize,
    pub webhook_timeout: Duration,
    pub style: MessageStyle,
}

impl Config {
    pub fn from_params(params: Params) -> Self {
        Config {
            webhook_url: params.webhook_url,
            keywords: parse_keywords(&params.keywords),
            categories: parse_categories(&params.categories),
            openai_api_key: params.openai_api_key.filter(|k| !k.trim().is_empty()),
            target_day: None,
            max_results: DEFAULT_MAX_RESULTS,
            webhook_timeout: Duration::from_secs(DEFAULT_WEBHOOK_TIMEOUT_SECS),
            style: MessageStyle::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let params = Params {
            webhook_url: var("WEBHOOK_URL").context("WEBHOOK_URL must be set")?,
            keywords: var("KEYWORDS").context("KEYWORDS must be set")?,
            categories: var("CATEGORIES").context("CATEGORIES must be set")?,
            openai_api_key: var("OPENAI_API_KEY"),
        };
        let mut config = Config::from_params(params);

        if let Some(day) = var("TARGET_DAY").filter(|s| !s.trim().is_empty()) {
            config.target_day = Some(parse_day(&day)?);
        }
        if let Some(max) = var("ARXIV_MAX_RESULTS") {
            config.max_results = max
                .trim()
                .parse()
                .context("ARXIV_MAX_RESULTS must be a positive integer")?;
        }
        if let Some(secs) = var("WEBHOOK_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .context("WEBHOOK_TIMEOUT_SECS must be an integer number of seconds")?;
            config.webhook_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = var("INCLUDE_PDF_LINK") {
            config.style.include_pdf_link = parse_flag(&flag)?;
        }
        if let Some(spacing) = var("LINE_SPACING") {
            config.style.spacing = spacing.parse()?;
        }

        Ok(config)
    }

    pub fn require_openai_api_key(&self) -> Result<&String> {
        self.openai_api_key
            .as_ref()
            .context("OPENAI_API_KEY must be set")
    }
}

/// Splits a comma-delimited keyword list. Blank entries are dropped and duplicates
/// removed, keeping the first occurrence so the query order is stable.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
    }
    keywords
}

/// Category codes never contain spaces, so all of them are stripped before splitting.
pub fn parse_categories(raw: &str) -> Vec<String> {
    raw.replace(' ', "")
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a `YYYYMMDD` day.
pub fn parse_day(raw: &str) -> Result<Date> {
    let raw = raw.trim();
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        anyhow::bail!("'{}' is not an 8-digit YYYYMMDD day", raw);
    }
    Date::parse(raw, format_description!("[year][month][day]"))
        .with_context(|| format!("'{}' is not a valid calendar date", raw))
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("'{}' is not a boolean flag", other),
    }
}
