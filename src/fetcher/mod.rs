pub mod http_fetcher;
pub mod query;

use async_trait::async_trait;

use crate::app::Result;

pub use query::{ArticleQuery, OrderBy};

#[async_trait]
pub trait Fetcher {
    /// Fetch `url` and return the whole response body as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}
