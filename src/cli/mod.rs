pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, FeedSettings};
use crate::fetcher::OrderBy;

#[derive(Parser)]
#[command(name = "touchline")]
#[command(about = "World Cup football news in the terminal", long_about = None)]
pub struct Cli {
    /// Number of articles to request
    #[arg(short = 'n', long, global = true)]
    pub count: Option<u32>,

    /// Sort order of the results
    #[arg(short, long, value_enum, global = true)]
    pub order: Option<OrderBy>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load one page of articles and print it
    List {
        /// Print the articles as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the request URL that would be fetched
    Url,
    /// Launch the TUI (default)
    Tui,
}

impl Cli {
    /// Settings from the config file with command-line overrides applied.
    pub fn feed_settings(&self, config: &Config) -> FeedSettings {
        let mut settings = config.feed_settings();
        if let Some(count) = self.count {
            settings.articles_count = count.to_string();
        }
        if let Some(order) = self.order {
            settings.order_by = order;
        }
        settings
    }
}
