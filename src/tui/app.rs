use crate::config::FeedSettings;
use crate::domain::Article;
use crate::loader::LoaderListener;

pub const NO_ARTICLES: &str = "No articles found.";
pub const NO_CONNECTION: &str = "No internet connection.";
pub const LOAD_COMPLETED: &str = "Fetching new data completed.";

pub struct TuiApp {
    pub articles: Vec<Article>,
    pub article_index: usize,
    pub settings: FeedSettings,
    /// Shown in place of the list when there is nothing to display.
    pub empty_message: Option<&'static str>,
    pub status_message: Option<String>,
    pub is_loading: bool,
    pub should_quit: bool,
}

impl TuiApp {
    pub fn new(settings: FeedSettings) -> Self {
        Self {
            articles: Vec::new(),
            article_index: 0,
            settings,
            empty_message: None,
            status_message: None,
            is_loading: false,
            should_quit: false,
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.article_index)
    }

    pub fn move_up(&mut self) {
        self.article_index = self.article_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if !self.articles.is_empty() && self.article_index < self.articles.len() - 1 {
            self.article_index += 1;
        }
    }

    pub fn page_up(&mut self, page: usize) {
        self.article_index = self.article_index.saturating_sub(page.max(1));
    }

    pub fn page_down(&mut self, page: usize) {
        if self.articles.is_empty() {
            return;
        }
        self.article_index = (self.article_index + page.max(1)).min(self.articles.len() - 1);
    }

    /// A new load has been started; clear the previous empty-state text.
    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.empty_message = None;
        self.status_message = None;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

impl LoaderListener for TuiApp {
    fn on_delivered(&mut self, articles: Option<&[Article]>) {
        self.is_loading = false;
        self.article_index = 0;

        match articles {
            Some(articles) if !articles.is_empty() => {
                self.articles = articles.to_vec();
                self.empty_message = None;
                self.set_status(LOAD_COMPLETED.to_string());
            }
            _ => {
                self.articles.clear();
                self.empty_message = Some(NO_ARTICLES);
                self.status_message = None;
            }
        }
    }

    fn on_cleared(&mut self) {
        self.articles.clear();
        self.article_index = 0;
    }

    fn on_connectivity_unavailable(&mut self) {
        self.is_loading = false;
        self.articles.clear();
        self.article_index = 0;
        self.empty_message = Some(NO_CONNECTION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles(n: usize) -> Vec<Article> {
        (0..n)
            .map(|i| {
                Article::new(
                    format!("article {}", i),
                    "Football",
                    "2018-07-15T16:00:00Z",
                    "Not Available",
                    format!("https://example.com/{}", i),
                )
            })
            .collect()
    }

    #[test]
    fn test_delivery_replaces_list() {
        let mut app = TuiApp::new(FeedSettings::default());
        app.begin_loading();
        app.on_delivered(Some(articles(3).as_slice()));

        assert!(!app.is_loading);
        assert_eq!(app.articles.len(), 3);
        assert_eq!(app.empty_message, None);
        assert_eq!(app.status_message.as_deref(), Some(LOAD_COMPLETED));

        app.article_index = 2;
        app.on_delivered(Some(articles(1).as_slice()));
        assert_eq!(app.articles.len(), 1);
        assert_eq!(app.article_index, 0);
    }

    #[test]
    fn test_empty_or_failed_delivery_shows_no_articles() {
        let mut app = TuiApp::new(FeedSettings::default());
        app.on_delivered(Some(articles(2).as_slice()));

        app.on_delivered(None);
        assert!(app.articles.is_empty());
        assert_eq!(app.empty_message, Some(NO_ARTICLES));
        assert_eq!(app.status_message, None);

        app.on_delivered(Some(&[][..]));
        assert_eq!(app.empty_message, Some(NO_ARTICLES));
        assert_eq!(app.status_message, None);
    }

    #[test]
    fn test_offline_shows_no_connection() {
        let mut app = TuiApp::new(FeedSettings::default());
        app.on_delivered(Some(articles(2).as_slice()));
        app.begin_loading();

        app.on_connectivity_unavailable();
        assert!(!app.is_loading);
        assert!(app.articles.is_empty());
        assert_eq!(app.empty_message, Some(NO_CONNECTION));
    }

    #[test]
    fn test_begin_loading_clears_empty_state() {
        let mut app = TuiApp::new(FeedSettings::default());
        app.on_connectivity_unavailable();
        app.begin_loading();

        assert!(app.is_loading);
        assert_eq!(app.empty_message, None);
    }

    #[test]
    fn test_cleared_drops_articles() {
        let mut app = TuiApp::new(FeedSettings::default());
        app.on_delivered(Some(articles(2).as_slice()));
        app.on_cleared();

        assert!(app.articles.is_empty());
        assert!(app.selected_article().is_none());
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut app = TuiApp::new(FeedSettings::default());
        app.move_down();
        app.page_down(5);
        assert_eq!(app.article_index, 0);

        app.on_delivered(Some(articles(4).as_slice()));
        app.move_up();
        assert_eq!(app.article_index, 0);

        app.move_down();
        app.move_down();
        assert_eq!(app.selected_article().unwrap().title(), "article 2");

        app.page_down(10);
        assert_eq!(app.article_index, 3);
        app.move_down();
        assert_eq!(app.article_index, 3);

        app.page_up(2);
        assert_eq!(app.article_index, 1);
        app.page_up(10);
        assert_eq!(app.article_index, 0);
    }
}
