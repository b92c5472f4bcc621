//! Single-flight background loading of the article list.
//!
//! ```text
//! start → spawn(probe → build URL → fetch → normalize) → channel → next_delivery/poll_delivery → listener
//! ```
//!
//! Every `start` bumps a generation counter. Completions carry the generation
//! they were started with, and only the one matching the latest start is
//! handed to the listener. Older tasks are aborted, but a result that still
//! slips through is dropped on the caller's side. The connectivity probe
//! runs inside the spawned task, so `start` never waits on the network.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::connectivity::Connectivity;
use crate::domain::Article;
use crate::fetcher::{ArticleQuery, Fetcher};
use crate::normalizer::Normalizer;

/// Receiver of loader outcomes. Called only from the task that owns the loader.
pub trait LoaderListener {
    /// A load finished. `None` means nothing usable came back.
    fn on_delivered(&mut self, articles: Option<&[Article]>);

    /// Previously delivered articles should no longer be shown.
    fn on_cleared(&mut self);

    /// A load was requested while the network was unreachable.
    fn on_connectivity_unavailable(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderState {
    Idle,
    Loading,
    Delivered(Vec<Article>),
    Failed,
}

#[derive(Debug)]
enum Finished {
    Offline,
    Loaded(Option<Vec<Article>>),
}

#[derive(Debug)]
struct Completion {
    generation: u64,
    finished: Finished,
}

pub struct ArticleLoader {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    normalizer: Normalizer,
    connectivity: Arc<dyn Connectivity + Send + Sync>,
    generation: u64,
    task: Option<JoinHandle<()>>,
    state: LoaderState,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl ArticleLoader {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        normalizer: Normalizer,
        connectivity: Arc<dyn Connectivity + Send + Sync>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            normalizer,
            connectivity,
            generation: 0,
            task: None,
            state: LoaderState::Idle,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoaderState::Loading
    }

    /// Start a fresh load, superseding any load still in flight.
    ///
    /// Returns immediately. An unreachable network is reported to the
    /// listener on delivery. Must be called from within a tokio runtime.
    pub fn start(&mut self, query: &ArticleQuery) {
        self.invalidate();

        let generation = self.generation;
        let fetcher = self.fetcher.clone();
        let normalizer = self.normalizer.clone();
        let connectivity = self.connectivity.clone();
        let query = query.clone();
        let tx = self.tx.clone();

        self.task = Some(tokio::spawn(async move {
            let finished = if connectivity.is_reachable().await {
                Finished::Loaded(load_in_background(fetcher.as_ref(), &normalizer, &query).await)
            } else {
                Finished::Offline
            };
            // The receiver lives as long as the loader.
            let _ = tx.send(Completion {
                generation,
                finished,
            });
        }));
        self.state = LoaderState::Loading;

        debug!("Started article load #{}", generation);
    }

    /// Drop delivered articles and any pending load without starting a new one.
    pub fn reset<L>(&mut self, listener: &mut L)
    where
        L: LoaderListener + ?Sized,
    {
        self.invalidate();
        self.state = LoaderState::Idle;
        listener.on_cleared();
    }

    /// Wait for the current load to finish and deliver it.
    ///
    /// Returns `false` immediately when nothing is loading.
    pub async fn next_delivery<L>(&mut self, listener: &mut L) -> bool
    where
        L: LoaderListener + ?Sized,
    {
        while self.is_loading() {
            match self.rx.recv().await {
                Some(completion) => {
                    if self.accept(completion, listener) {
                        return true;
                    }
                }
                None => return false,
            }
        }
        false
    }

    /// Deliver a finished load if one is waiting. Never blocks.
    pub fn poll_delivery<L>(&mut self, listener: &mut L) -> bool
    where
        L: LoaderListener + ?Sized,
    {
        while let Ok(completion) = self.rx.try_recv() {
            if self.accept(completion, listener) {
                return true;
            }
        }
        false
    }

    fn accept<L>(&mut self, completion: Completion, listener: &mut L) -> bool
    where
        L: LoaderListener + ?Sized,
    {
        if completion.generation != self.generation || !self.is_loading() {
            debug!(
                "Ignoring stale article load #{} (current #{})",
                completion.generation, self.generation
            );
            return false;
        }

        self.task = None;
        match completion.finished {
            Finished::Offline => {
                warn!("Network unreachable, not loading articles");
                self.state = LoaderState::Idle;
                listener.on_connectivity_unavailable();
            }
            Finished::Loaded(Some(articles)) => {
                info!("Loaded {} articles", articles.len());
                listener.on_delivered(Some(articles.as_slice()));
                self.state = LoaderState::Delivered(articles);
            }
            Finished::Loaded(None) => {
                self.state = LoaderState::Failed;
                listener.on_delivered(None);
            }
        }
        true
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ArticleLoader {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn load_in_background(
    fetcher: &(dyn Fetcher + Send + Sync),
    normalizer: &Normalizer,
    query: &ArticleQuery,
) -> Option<Vec<Article>> {
    let url = match query.to_url() {
        Ok(url) => url,
        Err(e) => {
            error!("Problem building the request URL: {}", e);
            return None;
        }
    };

    let body = match fetcher.fetch(url.as_str()).await {
        Ok(body) => Some(body),
        Err(e) => {
            error!("Problem making the HTTP request: {}", e);
            None
        }
    };

    normalizer.normalize(body.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use async_trait::async_trait;
    use serde_json::json;
    use url::Url;

    use crate::app::{Result, TouchlineError};
    use crate::connectivity::AlwaysReachable;
    use crate::fetcher::OrderBy;

    /// Answers with `page-size` articles after `page-size * delay_unit`,
    /// so smaller pages finish first.
    struct PagedFetcher {
        delay_unit: Duration,
        requests: Mutex<Vec<String>>,
    }

    impl PagedFetcher {
        fn new(delay_unit: Duration) -> Self {
            Self {
                delay_unit,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Fetcher for PagedFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());

            let url = Url::parse(url)?;
            let size: u32 = url
                .query_pairs()
                .find(|(k, _)| k == "page-size")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(0);

            tokio::time::sleep(self.delay_unit * size).await;

            let titles: Vec<String> = (0..size).map(|i| format!("article {}", i)).collect();
            Ok(results_body(&titles))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String> {
            Err(TouchlineError::HttpStatus(500))
        }
    }

    struct Offline;

    #[async_trait]
    impl Connectivity for Offline {
        async fn is_reachable(&self) -> bool {
            false
        }
    }

    /// Takes far longer to answer than any test waits.
    struct StalledProbe;

    #[async_trait]
    impl Connectivity for StalledProbe {
        async fn is_reachable(&self) -> bool {
            tokio::time::sleep(Duration::from_secs(30)).await;
            true
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        deliveries: Vec<Option<Vec<String>>>,
        cleared: usize,
        offline: usize,
    }

    impl LoaderListener for RecordingListener {
        fn on_delivered(&mut self, articles: Option<&[Article]>) {
            self.deliveries.push(
                articles.map(|a| a.iter().map(|a| a.title().to_string()).collect()),
            );
        }

        fn on_cleared(&mut self) {
            self.cleared += 1;
        }

        fn on_connectivity_unavailable(&mut self) {
            self.offline += 1;
        }
    }

    fn results_body(titles: &[String]) -> String {
        let results: Vec<_> = titles
            .iter()
            .map(|title| {
                json!({
                    "webTitle": title,
                    "sectionName": "Football",
                    "webPublicationDate": "2018-07-15T16:00:00Z",
                    "webUrl": "https://www.theguardian.com/football/x",
                    "tags": []
                })
            })
            .collect();
        json!({ "response": { "results": results } }).to_string()
    }

    fn query(page_size: &str) -> ArticleQuery {
        ArticleQuery {
            base_url: "https://content.guardianapis.com/search".to_string(),
            page_size: page_size.to_string(),
            order_by: OrderBy::Newest,
            api_key: "test".to_string(),
        }
    }

    fn loader_with(fetcher: Arc<dyn Fetcher + Send + Sync>) -> ArticleLoader {
        ArticleLoader::new(fetcher, Normalizer::new(), Arc::new(AlwaysReachable))
    }

    #[tokio::test]
    async fn test_load_delivers_articles() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(1)));
        let mut loader = loader_with(fetcher.clone());
        let mut listener = RecordingListener::default();

        loader.start(&query("3"));
        assert!(loader.is_loading());
        assert!(loader.next_delivery(&mut listener).await);

        assert_eq!(listener.deliveries.len(), 1);
        assert_eq!(listener.deliveries[0].as_ref().unwrap().len(), 3);
        assert!(matches!(loader.state(), LoaderState::Delivered(a) if a.len() == 3));

        let requests = fetcher.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("q=football+worldcup"));
    }

    #[tokio::test]
    async fn test_restart_delivers_only_latest() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(20)));
        let mut loader = loader_with(fetcher);
        let mut listener = RecordingListener::default();

        loader.start(&query("5"));
        loader.start(&query("2"));

        assert!(loader.next_delivery(&mut listener).await);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!loader.poll_delivery(&mut listener));

        assert_eq!(listener.deliveries.len(), 1);
        assert_eq!(listener.deliveries[0].as_ref().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_completion_is_ignored() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(20)));
        let mut loader = loader_with(fetcher);
        let mut listener = RecordingListener::default();

        loader.start(&query("1"));
        let stale_generation = loader.generation;
        loader.start(&query("1"));

        loader
            .tx
            .send(Completion {
                generation: stale_generation,
                finished: Finished::Loaded(Some(Vec::new())),
            })
            .unwrap();

        assert!(!loader.poll_delivery(&mut listener));
        assert!(listener.deliveries.is_empty());
        assert!(loader.is_loading());

        assert!(loader.next_delivery(&mut listener).await);
        assert_eq!(listener.deliveries, vec![Some(vec!["article 0".to_string()])]);
    }

    #[tokio::test]
    async fn test_fetch_failure_delivers_none() {
        let mut loader = loader_with(Arc::new(FailingFetcher));
        let mut listener = RecordingListener::default();

        loader.start(&query("10"));
        assert!(loader.next_delivery(&mut listener).await);

        assert_eq!(listener.deliveries, vec![None]);
        assert_eq!(loader.state(), &LoaderState::Failed);
    }

    #[tokio::test]
    async fn test_invalid_base_url_delivers_none() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(1)));
        let mut loader = loader_with(fetcher.clone());
        let mut listener = RecordingListener::default();

        let mut q = query("1");
        q.base_url = "search".to_string();
        loader.start(&q);
        assert!(loader.next_delivery(&mut listener).await);

        assert_eq!(listener.deliveries, vec![None]);
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offline_skips_fetch() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(1)));
        let mut loader = ArticleLoader::new(fetcher.clone(), Normalizer::new(), Arc::new(Offline));
        let mut listener = RecordingListener::default();

        loader.start(&query("1"));
        assert!(loader.next_delivery(&mut listener).await);

        assert_eq!(listener.offline, 1);
        assert!(listener.deliveries.is_empty());
        assert_eq!(loader.state(), &LoaderState::Idle);
        assert!(!loader.next_delivery(&mut listener).await);
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_does_not_wait_for_probe() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(1)));
        let mut loader =
            ArticleLoader::new(fetcher.clone(), Normalizer::new(), Arc::new(StalledProbe));
        let mut listener = RecordingListener::default();

        let started = Instant::now();
        loader.start(&query("1"));
        assert!(started.elapsed() < Duration::from_secs(1));

        assert!(loader.is_loading());
        assert!(!loader.poll_delivery(&mut listener));
        assert_eq!(listener.offline, 0);

        loader.reset(&mut listener);
        assert!(fetcher.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_and_drops_pending_load() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(10)));
        let mut loader = loader_with(fetcher);
        let mut listener = RecordingListener::default();

        loader.start(&query("2"));
        loader.reset(&mut listener);

        assert_eq!(listener.cleared, 1);
        assert_eq!(loader.state(), &LoaderState::Idle);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!loader.poll_delivery(&mut listener));
        assert!(listener.deliveries.is_empty());
    }

    #[tokio::test]
    async fn test_restart_after_delivery() {
        let fetcher = Arc::new(PagedFetcher::new(Duration::from_millis(1)));
        let mut loader = loader_with(fetcher);
        let mut listener = RecordingListener::default();

        loader.start(&query("1"));
        loader.next_delivery(&mut listener).await;
        loader.start(&query("4"));
        loader.next_delivery(&mut listener).await;

        let sizes: Vec<_> = listener
            .deliveries
            .iter()
            .map(|d| d.as_ref().map(Vec::len))
            .collect();
        assert_eq!(sizes, vec![Some(1), Some(4)]);
    }
}
