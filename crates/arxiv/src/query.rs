use common::{NotifyError, NotifyResult};
use time::macros::format_description;
use time::Date;

const OPEN: &str = "%28";
const CLOSE: &str = "%29";

/// Builds an arXiv `search_query` value matching any keyword in title or abstract,
/// any of the categories, and submissions on `day` (`YYYYMMDD`, whole UTC day).
///
/// Keywords containing a space are single-quoted so arXiv treats them as a phrase.
/// Parentheses are emitted pre-encoded as `%28`/`%29`; nothing else is encoded.
/// Empty inputs produce a malformed query, use [`Filter`] to rule them out.
pub fn build_query<K, C>(keywords: &[K], categories: &[C], day: &str) -> String
where
    K: AsRef<str>,
    C: AsRef<str>,
{
    let keyword_clauses = keywords
        .iter()
        .map(|k| {
            let k = k.as_ref();
            let token = if k.contains(' ') {
                format!("'{}'", k)
            } else {
                k.to_string()
            };
            format!("ti:\"{token}\" OR abs:\"{token}\"")
        })
        .collect::<Vec<_>>()
        .join(" OR ");

    let category_clauses = categories
        .iter()
        .map(|c| format!("cat:\"{}\"", c.as_ref()))
        .collect::<Vec<_>>()
        .join(" OR ");

    format!(
        "{OPEN}{keyword_clauses}{CLOSE} AND {OPEN}{category_clauses}{CLOSE} AND submittedDate:[{day} TO {day}235959]"
    )
}

/// Validated search filter: at least one keyword and one category, one UTC day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    keywords: Vec<String>,
    categories: Vec<String>,
    day: Date,
}

impl Filter {
    pub fn new(keywords: Vec<String>, categories: Vec<String>, day: Date) -> NotifyResult<Self> {
        let mut unique: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords.into_iter().filter(|k| !k.is_empty()) {
            if !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        let categories: Vec<String> = categories.into_iter().filter(|c| !c.is_empty()).collect();

        if unique.is_empty() {
            return Err(NotifyError::InvalidFilter(
                "at least one non-empty keyword is required".to_string(),
            ));
        }
        if categories.is_empty() {
            return Err(NotifyError::InvalidFilter(
                "at least one category is required".to_string(),
            ));
        }

        Ok(Self {
            keywords: unique,
            categories,
            day,
        })
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn day(&self) -> Date {
        self.day
    }

    /// The target day as `YYYYMMDD`.
    pub fn day_stamp(&self) -> String {
        format!(
            "{:04}{:02}{:02}",
            self.day.year(),
            u8::from(self.day.month()),
            self.day.day()
        )
    }

    /// Three-letter English month abbreviation of the target day, e.g. `Jan`.
    pub fn month_abbrev(&self) -> String {
        self.day
            .format(format_description!("[month repr:short]"))
            .unwrap_or_else(|_| self.day.month().to_string().chars().take(3).collect())
    }

    pub fn query(&self) -> String {
        build_query(&self.keywords, &self.categories, &self.day_stamp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_build_query_mixed_keywords() {
        let query = build_query(&["dl", "deep learning"], &["cs.AI", "cs.CV"], "20240101");
        let expect = concat!(
            "%28ti:\"dl\" OR abs:\"dl\" OR ",
            "ti:\"'deep learning'\" OR abs:\"'deep learning'\"%29 AND ",
            "%28cat:\"cs.AI\" OR cat:\"cs.CV\"%29 AND ",
            "submittedDate:[20240101 TO 20240101235959]"
        );
        assert_eq!(query, expect);
    }

    #[test]
    fn test_build_query_single_elements() {
        let query = build_query(&["transformer"], &["cs.CL"], "20231231");
        assert_eq!(
            query,
            "%28ti:\"transformer\" OR abs:\"transformer\"%29 AND %28cat:\"cs.CL\"%29 AND submittedDate:[20231231 TO 20231231235959]"
        );
    }

    #[test]
    fn test_build_query_has_no_trailing_or() {
        for keywords in [vec!["a"], vec!["a", "b c"]] {
            for categories in [vec!["cs.AI"], vec!["cs.AI", "cs.LG"]] {
                let query = build_query(&keywords, &categories, "20240101");
                assert!(!query.contains(" OR %29"), "{query}");
                assert!(!query.contains("%28 OR"), "{query}");
                assert!(query.starts_with("%28ti:"));
                assert!(query.ends_with(" AND submittedDate:[20240101 TO 20240101235959]"));
                assert_eq!(query.matches("%28").count(), 2);
                assert_eq!(query.matches("%29").count(), 2);
                assert_eq!(query.matches("cat:").count(), categories.len());
                assert_eq!(query.matches(" OR ").count(), keywords.len() * 2 - 1 + categories.len() - 1);
            }
        }
    }

    #[test]
    fn test_build_query_preserves_input_order() {
        let query = build_query(&["b", "a"], &["z", "y"], "20240101");
        assert!(query.find("\"b\"").unwrap() < query.find("\"a\"").unwrap());
        assert!(query.find("\"z\"").unwrap() < query.find("\"y\"").unwrap());
    }

    #[test]
    fn test_filter_rejects_empty_inputs() {
        let day = date!(2024 - 01 - 01);
        let err = Filter::new(vec![String::new()], vec!["cs.AI".into()], day).unwrap_err();
        assert!(matches!(err, NotifyError::InvalidFilter(_)));
        let err = Filter::new(vec!["dl".into()], vec![], day).unwrap_err();
        assert!(matches!(err, NotifyError::InvalidFilter(_)));
    }

    #[test]
    fn test_filter_dedups_and_builds_query() {
        let filter = Filter::new(
            vec!["dl".into(), "".into(), "deep learning".into(), "dl".into()],
            vec!["cs.AI".into(), "cs.CV".into()],
            date!(2024 - 01 - 01),
        )
        .unwrap();

        assert_eq!(filter.keywords(), ["dl", "deep learning"]);
        assert_eq!(filter.day_stamp(), "20240101");
        assert_eq!(filter.month_abbrev(), "Jan");
        assert_eq!(
            filter.query(),
            build_query(&["dl", "deep learning"], &["cs.AI", "cs.CV"], "20240101")
        );
    }

    #[test]
    fn test_day_stamp_pads() {
        let filter = Filter::new(vec!["x".into()], vec!["cs.AI".into()], date!(2023 - 09 - 05)).unwrap();
        assert_eq!(filter.day_stamp(), "20230905");
        assert_eq!(filter.month_abbrev(), "Sep");
    }
}
