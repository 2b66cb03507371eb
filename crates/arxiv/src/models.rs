use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// One search result, as returned by the arXiv API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub published: OffsetDateTime,
    /// Abstract-page URL, e.g. `http://arxiv.org/abs/1812.04948v3`.
    pub entry_id: String,
    pub pdf_url: Option<String>,
    pub categories: Vec<String>,
    pub summary: String,
}

impl PaperRecord {
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Published timestamp in UTC, e.g. `2018-12-12 18:56:19+00:00`.
    pub fn published_display(&self) -> String {
        let utc = self.published.to_offset(UtcOffset::UTC);
        utc.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        ))
        .unwrap_or_else(|_| utc.to_string())
    }

    /// Unversioned abstract-page URL. Taken from the PDF link when there is one,
    /// otherwise from the entry identifier; both forms resolve to the same string.
    pub fn abs_link(&self) -> String {
        match &self.pdf_url {
            Some(pdf_url) => abs_link_from_pdf_url(pdf_url),
            None => abs_link_from_entry_id(&self.entry_id),
        }
    }

    /// The summary with every line break replaced by a single space.
    pub fn normalized_summary(&self) -> String {
        self.summary.trim().replace("\r\n", " ").replace('\n', " ")
    }
}

pub fn abs_link_from_pdf_url(pdf_url: &str) -> String {
    let url = pdf_url.strip_suffix(".pdf").unwrap_or(pdf_url);
    strip_version(&url.replacen("/pdf/", "/abs/", 1)).to_string()
}

pub fn abs_link_from_entry_id(entry_id: &str) -> String {
    strip_version(entry_id).to_string()
}

/// Drops a trailing `v<digits>` from the last path segment.
fn strip_version(url: &str) -> &str {
    let segment_start = url.rfind('/').map_or(0, |i| i + 1);
    match url[segment_start..].rfind('v') {
        Some(v) => {
            let digits = &url[segment_start + v + 1..];
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                &url[..segment_start + v]
            } else {
                url
            }
        }
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn record(entry_id: &str, pdf_url: Option<&str>) -> PaperRecord {
        PaperRecord {
            title: "A Style-Based Generator Architecture for Generative Adversarial Networks"
                .to_string(),
            authors: vec![
                "Tero Karras".to_string(),
                "Samuli Laine".to_string(),
                "Timo Aila".to_string(),
            ],
            published: datetime!(2018-12-12 18:56:19 UTC),
            entry_id: entry_id.to_string(),
            pdf_url: pdf_url.map(str::to_string),
            categories: vec!["cs.NE".to_string(), "cs.LG".to_string(), "stat.ML".to_string()],
            summary: "We propose an alternative generator\narchitecture for generative\nadversarial networks.".to_string(),
        }
    }

    #[test]
    fn test_abs_link_sources_agree() {
        let with_pdf = record("http://arxiv.org/abs/1812.04948v3", Some("http://arxiv.org/pdf/1812.04948v3"));
        let without_pdf = record("http://arxiv.org/abs/1812.04948v3", None);

        assert_eq!(with_pdf.abs_link(), "http://arxiv.org/abs/1812.04948");
        assert_eq!(with_pdf.abs_link(), without_pdf.abs_link());
    }

    #[test]
    fn test_abs_link_handles_long_versions_and_old_ids() {
        assert_eq!(
            abs_link_from_pdf_url("https://arxiv.org/pdf/2401.00001v12.pdf"),
            "https://arxiv.org/abs/2401.00001"
        );
        assert_eq!(
            abs_link_from_entry_id("http://arxiv.org/abs/hep-th/9901001v2"),
            "http://arxiv.org/abs/hep-th/9901001"
        );
        assert_eq!(
            abs_link_from_entry_id("http://arxiv.org/abs/2401.00001"),
            "http://arxiv.org/abs/2401.00001"
        );
    }

    #[test]
    fn test_published_display_is_utc() {
        let mut paper = record("http://arxiv.org/abs/1812.04948v3", None);
        assert_eq!(paper.published_display(), "2018-12-12 18:56:19+00:00");

        paper.published = datetime!(2018-12-12 20:56:19 +2);
        assert_eq!(paper.published_display(), "2018-12-12 18:56:19+00:00");
    }

    #[test]
    fn test_normalized_summary_collapses_line_breaks() {
        let paper = record("http://arxiv.org/abs/1812.04948v3", None);
        assert_eq!(
            paper.normalized_summary(),
            "We propose an alternative generator architecture for generative adversarial networks."
        );
        assert_eq!(paper.first_author(), Some("Tero Karras"));
    }
}
