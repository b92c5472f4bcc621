use serde::Deserialize;
use serde_json::Value;

use crate::app::{Result, TouchlineError};
use crate::domain::{Article, CONTRIBUTOR_NOT_AVAILABLE};

/// What to do with a result element that lacks a required field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFieldPolicy {
    /// Drop the defective element and keep the rest.
    #[default]
    Skip,
    /// Fail the whole batch.
    Abort,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    policy: MissingFieldPolicy,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MissingFieldPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MissingFieldPolicy {
        self.policy
    }

    /// Turn a raw search response into articles.
    ///
    /// Returns `None` for an absent or empty body and for any failure that
    /// rejects the whole payload. Failures are logged, never returned.
    pub fn normalize(&self, body: Option<&str>) -> Option<Vec<Article>> {
        let body = body.filter(|b| !b.is_empty())?;

        match self.try_normalize(body) {
            Ok(articles) => Some(articles),
            Err(e) => {
                tracing::error!("Problem parsing the article JSON results: {}", e);
                None
            }
        }
    }

    pub fn try_normalize(&self, body: &str) -> Result<Vec<Article>> {
        let root: Value =
            serde_json::from_str(body).map_err(|e| TouchlineError::Parse(e.to_string()))?;

        let results = root
            .get("response")
            .and_then(|r| r.get("results"))
            .and_then(Value::as_array)
            .ok_or_else(|| TouchlineError::Parse("missing response.results array".into()))?;

        let mut articles = Vec::with_capacity(results.len());

        for (index, element) in results.iter().enumerate() {
            match extract_article(index, element) {
                Ok(article) => articles.push(article),
                Err(e) => match self.policy {
                    MissingFieldPolicy::Skip => {
                        tracing::warn!("Skipping result: {}", e);
                    }
                    MissingFieldPolicy::Abort => return Err(e),
                },
            }
        }

        Ok(articles)
    }
}

fn extract_article(index: usize, element: &Value) -> Result<Article> {
    let title = required_str(index, element, "webTitle")?;
    let section = required_str(index, element, "sectionName")?;
    let publish_date = required_str(index, element, "webPublicationDate")?;
    let url = required_str(index, element, "webUrl")?;

    let contributor = match element
        .get("tags")
        .and_then(Value::as_array)
        .and_then(|tags| tags.first())
    {
        Some(tag) => tag
            .get("webTitle")
            .and_then(Value::as_str)
            .ok_or(TouchlineError::FieldMissing {
                index,
                field: "tags[0].webTitle",
            })?,
        None => CONTRIBUTOR_NOT_AVAILABLE,
    };

    Ok(Article::new(title, section, publish_date, contributor, url))
}

fn required_str<'a>(index: usize, element: &'a Value, field: &'static str) -> Result<&'a str> {
    element
        .get(field)
        .and_then(Value::as_str)
        .ok_or(TouchlineError::FieldMissing { index, field })
}
