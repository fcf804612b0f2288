//! Core types for queries and scraped result records.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Source value used when a result carries no attribution element.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// One search operation's input: keywords plus how many pages to walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    keywords: String,
    page_count: usize,
}

impl SearchQuery {
    /// Build a query, rejecting empty keywords.
    ///
    /// A `page_count` below 1 is normalised to 1.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArgument`] if `keywords` is empty.
    pub fn new(keywords: impl Into<String>, page_count: i64) -> Result<Self, SearchError> {
        let keywords = keywords.into();
        if keywords.is_empty() {
            return Err(SearchError::InvalidArgument(
                "keywords must not be empty".into(),
            ));
        }
        let page_count = usize::try_from(page_count.max(1)).unwrap_or(usize::MAX);
        Ok(Self {
            keywords,
            page_count,
        })
    }

    /// The raw keyword text, before percent-encoding.
    pub fn keywords(&self) -> &str {
        &self.keywords
    }

    /// Number of pages to request (always at least 1).
    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

/// A fully extracted search result as surfaced to callers.
///
/// `url` is never empty and unique within one search call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Result title text. May be empty when the title element had no text.
    pub title: String,
    /// Target of the result's link.
    pub url: String,
    /// Attribution text, or [`UNKNOWN_SOURCE`].
    pub source: String,
    /// Every summary fragment of the result, space-joined.
    pub content: String,
}

/// A record as produced by the extractor for one page, before the
/// cross-page dedup check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialRecord {
    pub title: String,
    pub url: Option<String>,
    pub source: Option<String>,
    pub content: String,
}

impl PartialRecord {
    /// Complete this record, applying source defaulting.
    ///
    /// Returns `None` when no usable URL was extracted.
    pub fn complete(self) -> Option<ResultRecord> {
        let url = self.url.filter(|u| !u.is_empty())?;
        Some(ResultRecord {
            title: self.title,
            url,
            source: self.source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            content: self.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_rejects_empty_keywords() {
        let err = SearchQuery::new("", 3).unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
    }

    #[test]
    fn query_normalises_page_count_below_one() {
        assert_eq!(SearchQuery::new("test", 0).expect("valid").page_count(), 1);
        assert_eq!(SearchQuery::new("test", -5).expect("valid").page_count(), 1);
        assert_eq!(SearchQuery::new("test", 4).expect("valid").page_count(), 4);
    }

    #[test]
    fn query_keeps_whitespace_keywords_verbatim() {
        let query = SearchQuery::new(" 人工智能 ", 1).expect("valid");
        assert_eq!(query.keywords(), " 人工智能 ");
    }

    #[test]
    fn partial_without_url_is_dropped() {
        let partial = PartialRecord {
            title: "Title".into(),
            url: None,
            source: None,
            content: String::new(),
        };
        assert!(partial.complete().is_none());
    }

    #[test]
    fn partial_with_empty_url_is_dropped() {
        let partial = PartialRecord {
            title: "Title".into(),
            url: Some(String::new()),
            source: None,
            content: String::new(),
        };
        assert!(partial.complete().is_none());
    }

    #[test]
    fn missing_source_defaults_to_unknown() {
        let partial = PartialRecord {
            title: String::new(),
            url: Some("https://example.com".into()),
            source: None,
            content: "summary".into(),
        };
        let record = partial.complete().expect("has url");
        assert_eq!(record.source, UNKNOWN_SOURCE);
        assert_eq!(record.title, "");
        assert_eq!(record.content, "summary");
    }

    #[test]
    fn record_serialises_exactly_four_fields() {
        let record = ResultRecord {
            title: "t".into(),
            url: "https://example.com".into(),
            source: "s".into(),
            content: "c".into(),
        };
        let value = serde_json::to_value(&record).expect("serialize");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 4);
        for key in ["title", "url", "source", "content"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }
}
