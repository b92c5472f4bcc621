use crate::app::{AppContext, Result, TouchlineError};
use crate::config::FeedSettings;
use crate::domain::Article;
use crate::loader::LoaderListener;
use crate::tui::app::NO_ARTICLES;

/// What a one-shot load produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum LoadOutcome {
    #[default]
    Nothing,
    Articles(Vec<Article>),
    Offline,
}

impl LoaderListener for LoadOutcome {
    fn on_delivered(&mut self, articles: Option<&[Article]>) {
        *self = match articles {
            Some(articles) if !articles.is_empty() => LoadOutcome::Articles(articles.to_vec()),
            _ => LoadOutcome::Nothing,
        };
    }

    fn on_cleared(&mut self) {
        *self = LoadOutcome::Nothing;
    }

    fn on_connectivity_unavailable(&mut self) {
        *self = LoadOutcome::Offline;
    }
}

/// Run a single load through the loader and wait for its delivery.
pub async fn load_once(ctx: &AppContext, settings: &FeedSettings) -> LoadOutcome {
    let mut loader = ctx.loader();
    let mut outcome = LoadOutcome::default();

    loader.start(&ctx.query(settings));
    loader.next_delivery(&mut outcome).await;

    outcome
}

pub async fn list_articles(ctx: &AppContext, settings: &FeedSettings, json: bool) -> Result<()> {
    match load_once(ctx, settings).await {
        LoadOutcome::Articles(articles) => {
            if json {
                let out = serde_json::to_string_pretty(&articles)
                    .map_err(|e| TouchlineError::Other(e.to_string()))?;
                println!("{}", out);
            } else {
                for article in &articles {
                    println!("{}\n", format_article(article));
                }
            }
        }
        LoadOutcome::Nothing => {
            if json {
                println!("[]");
            } else {
                println!("{}", NO_ARTICLES);
            }
        }
        LoadOutcome::Offline => return Err(TouchlineError::Offline),
    }

    Ok(())
}

pub fn print_url(ctx: &AppContext, settings: &FeedSettings) -> Result<()> {
    let url = ctx.query(settings).to_url()?;
    println!("{}", url);
    Ok(())
}

/// Multi-line text block for one article.
pub fn format_article(article: &Article) -> String {
    let when = match (article.formatted_date(), article.formatted_time()) {
        (Some(date), Some(time)) => format!("{} · {}", date, time),
        _ => String::new(),
    };

    format!(
        "{}\n  {}\n  {}\n  {}",
        article.title(),
        article.byline(),
        when,
        article.url()
    )
}
