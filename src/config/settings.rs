//! Session settings that parameterize the search request.
//!
//! Changes are published through a `watch` channel so that the screen owning
//! the loader can restart it whenever a value changes.

use std::sync::Arc;

use tokio::sync::watch;

use crate::fetcher::OrderBy;

pub const DEFAULT_ARTICLES_COUNT: &str = "10";
pub const MIN_ARTICLES_COUNT: u32 = 1;
pub const MAX_ARTICLES_COUNT: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// Page size, kept as the string the API receives.
    pub articles_count: String,
    pub order_by: OrderBy,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            articles_count: DEFAULT_ARTICLES_COUNT.to_string(),
            order_by: OrderBy::default(),
        }
    }
}

impl FeedSettings {
    /// Page size moved by `delta`, clamped to the range the API accepts.
    /// A non-numeric count restarts from the default.
    pub fn stepped_count(&self, delta: i64) -> String {
        let current = self
            .articles_count
            .trim()
            .parse::<i64>()
            .or_else(|_| DEFAULT_ARTICLES_COUNT.parse())
            .unwrap_or(MIN_ARTICLES_COUNT as i64);

        current
            .saturating_add(delta)
            .clamp(MIN_ARTICLES_COUNT as i64, MAX_ARTICLES_COUNT as i64)
            .to_string()
    }
}

/// Shared, observable settings store.
#[derive(Clone)]
pub struct SettingsHandle {
    tx: Arc<watch::Sender<FeedSettings>>,
}

impl SettingsHandle {
    pub fn new(initial: FeedSettings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> FeedSettings {
        self.tx.borrow().clone()
    }

    /// Receiver that observes every later change.
    pub fn subscribe(&self) -> watch::Receiver<FeedSettings> {
        self.tx.subscribe()
    }

    /// Apply `change` and notify subscribers if anything actually changed.
    pub fn update(&self, change: impl FnOnce(&mut FeedSettings)) -> bool {
        self.tx.send_if_modified(|settings| {
            let before = settings.clone();
            change(settings);
            *settings != before
        })
    }

    pub fn cycle_order(&self) -> bool {
        self.update(|s| s.order_by = s.order_by.next())
    }

    pub fn step_articles_count(&self, delta: i64) -> bool {
        self.update(|s| s.articles_count = s.stepped_count(delta))
    }
}
