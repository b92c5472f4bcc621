use std::sync::Arc;

use crate::app::error::Result;
use crate::config::{Config, FeedSettings};
use crate::connectivity::{AlwaysReachable, Connectivity, HostProbe};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::{ArticleQuery, Fetcher};
use crate::loader::ArticleLoader;
use crate::normalizer::Normalizer;

pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
    pub normalizer: Normalizer,
    pub connectivity: Arc<dyn Connectivity + Send + Sync>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        let normalizer = Normalizer::with_policy(config.articles.on_missing_field);
        let connectivity = Self::connectivity_for(&config);

        Ok(Self {
            config,
            fetcher,
            normalizer,
            connectivity,
        })
    }

    fn connectivity_for(config: &Config) -> Arc<dyn Connectivity + Send + Sync> {
        if !config.api.check_connectivity {
            return Arc::new(AlwaysReachable);
        }

        match HostProbe::for_url(&config.api.base_url) {
            Some(probe) => Arc::new(probe),
            None => {
                // The load itself reports the bad URL.
                tracing::warn!("Cannot probe {}, skipping connectivity check", config.api.base_url);
                Arc::new(AlwaysReachable)
            }
        }
    }

    /// A fresh loader wired to this context's fetcher, normalizer and probe.
    pub fn loader(&self) -> ArticleLoader {
        ArticleLoader::new(
            self.fetcher.clone(),
            self.normalizer.clone(),
            self.connectivity.clone(),
        )
    }

    pub fn query(&self, settings: &FeedSettings) -> ArticleQuery {
        ArticleQuery {
            base_url: self.config.api.base_url.clone(),
            page_size: settings.articles_count.clone(),
            order_by: settings.order_by,
            api_key: self.config.api.resolved_api_key(),
        }
    }
}
