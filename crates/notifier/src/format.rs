use arxiv::PaperRecord;
use common::MessageStyle;
use time::Date;

pub const SEPARATOR: &str = "--------------";
pub const QUERY_SYNTAX_URL: &str = "https://info.arxiv.org/help/api/user-manual.html";
pub const PROJECT_URL: &str = "https://github.com/kktsuji/arxiv-bot";

/// Renders webhook messages. Every line, the closing separator included, ends
/// with the newline of the configured [`common::LineSpacing`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFormatter {
    style: MessageStyle,
}

impl MessageFormatter {
    pub fn new(style: MessageStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> MessageStyle {
        self.style
    }

    pub fn build_header(&self, day: Date, month_abbrev: &str, query: &str, result_count: usize) -> String {
        self.render(&[
            format!("New papers on {} {}, {}.", month_abbrev, day.day(), day.year()),
            count_line(result_count),
            SEPARATOR.to_string(),
            format!("arXiv query: \"{}\"", query),
            format!("About arXiv query syntax: {}", QUERY_SYNTAX_URL),
            format!("About this bot: {}", PROJECT_URL),
        ])
    }

    /// `abstract_text` is inserted as given: either [`raw_abstract`] or a summary.
    pub fn build_paper_block(&self, record: &PaperRecord, abstract_text: &str) -> String {
        let authors = match record.first_author() {
            Some(first) => format!("Authors: {} et al.", first),
            None => "Authors: unknown".to_string(),
        };

        let mut lines = vec![
            format!("Title: {}", record.title),
            authors,
            format!("Published: {}", record.published_display()),
            format!("Link: {}", record.abs_link()),
        ];
        if self.style.include_pdf_link {
            if let Some(pdf_url) = &record.pdf_url {
                lines.push(format!("PDF: {}", pdf_url));
            }
        }
        lines.push(format!("Categories: {}", category_list(&record.categories)));
        lines.push(abstract_text.to_string());

        self.render(&lines)
    }

    fn render(&self, lines: &[String]) -> String {
        let nl = self.style.spacing.newline();
        let mut text = String::new();
        for line in lines {
            text.push_str(line);
            text.push_str(nl);
        }
        text.push_str(SEPARATOR);
        text.push_str(nl);
        text
    }
}

/// The abstract line used when no summarizer is configured.
pub fn raw_abstract(record: &PaperRecord) -> String {
    format!("Abstract: {}", record.normalized_summary())
}

fn count_line(result_count: usize) -> String {
    match result_count {
        0 => "No papers found.".to_string(),
        1 => "1 paper found.".to_string(),
        n => format!("{} papers found.", n),
    }
}

/// Bracketed, single-quoted list, e.g. `['cs.AI', 'cs.CV']`.
fn category_list(categories: &[String]) -> String {
    let quoted: Vec<String> = categories.iter().map(|c| format!("'{}'", c)).collect();
    format!("[{}]", quoted.join(", "))
}
