use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Contributor recorded when the source carries no byline tag.
pub const CONTRIBUTOR_NOT_AVAILABLE: &str = "Not Available";

/// Wire format of `webPublicationDate`.
const PUBLISH_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One news item as returned by the content API.
///
/// Built once by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    title: String,
    section: String,
    publish_date: String,
    contributor: String,
    url: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        section: impl Into<String>,
        publish_date: impl Into<String>,
        contributor: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            section: section.into(),
            publish_date: publish_date.into(),
            contributor: contributor.into(),
            url: url.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    /// Raw publication date, exactly as received.
    pub fn publish_date(&self) -> &str {
        &self.publish_date
    }

    pub fn contributor(&self) -> &str {
        &self.contributor
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_contributor(&self) -> bool {
        self.contributor != CONTRIBUTOR_NOT_AVAILABLE
    }

    /// Publication instant, or `None` when the wire value is malformed.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.publish_date, PUBLISH_DATE_FORMAT)
            .ok()
            .map(|dt| dt.and_utc())
    }

    /// Date like "Jul 15, 2018".
    pub fn formatted_date(&self) -> Option<String> {
        self.published_at()
            .map(|dt| dt.format("%b %-d, %Y").to_string())
    }

    /// 12-hour UTC clock time like "4:00 PM".
    pub fn formatted_time(&self) -> Option<String> {
        self.published_at()
            .map(|dt| dt.format("%-I:%M %p").to_string())
    }

    pub fn byline(&self) -> String {
        if self.has_contributor() {
            format!("By {} in {}", self.contributor, self.section)
        } else {
            format!("In {}", self.section)
        }
    }
}
