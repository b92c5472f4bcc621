//! Request composition for the content API search endpoint.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::Result;

pub const DEFAULT_BASE_URL: &str = "https://content.guardianapis.com/search";

/// Topical search term sent with every request.
pub const QUERY_TERM: &str = "football worldcup";

/// Only contributor tags are requested; the first one becomes the byline.
const SHOW_TAGS: &str = "contributor";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    #[default]
    Newest,
    Oldest,
    Relevance,
}

impl OrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::Newest => "newest",
            OrderBy::Oldest => "oldest",
            OrderBy::Relevance => "relevance",
        }
    }

    pub fn next(self) -> Self {
        match self {
            OrderBy::Newest => OrderBy::Oldest,
            OrderBy::Oldest => OrderBy::Relevance,
            OrderBy::Relevance => OrderBy::Newest,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single search request. Rebuilt for every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub base_url: String,
    pub page_size: String,
    pub order_by: OrderBy,
    pub api_key: String,
}

impl ArticleQuery {
    pub fn to_url(&self) -> Result<Url> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("page-size", self.page_size.as_str()),
                ("order-by", self.order_by.as_str()),
                ("show-tags", SHOW_TAGS),
                ("q", QUERY_TERM),
                ("api-key", self.api_key.as_str()),
            ],
        )?;
        Ok(url)
    }
}
