//! # Touchline
//!
//! A terminal reader for World Cup football coverage from the Guardian
//! content API.
//!
//! ## Architecture
//!
//! Touchline follows a small pipeline driven by a single-flight loader:
//!
//! ```text
//! Settings → ArticleQuery → Fetcher → Normalizer → ArticleLoader → UI
//! ```
//!
//! - [`fetcher`]: request composition and the HTTP client
//! - [`normalizer`]: Converts the search response into [`domain::Article`]s
//! - [`loader`]: Background load with latest-start-wins delivery
//! - [`tui`]: Terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the latest articles
//! touchline list
//!
//! # Ten most relevant, as JSON
//! touchline list --order relevance --count 10 --json
//!
//! # Launch TUI
//! touchline
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the fetcher,
/// normalizer and connectivity probe, and hands out loaders.
pub mod app;

/// Configuration management.
///
/// Loads from `~/.config/touchline/config.toml`, supporting:
/// - API endpoint and key
/// - Default page size, sort order and missing-field policy
/// - Custom keybindings
pub mod config;

/// Command-line interface using clap.
///
/// - `list [--json]` - Load and print one page of articles
/// - `url` - Print the request URL
/// - `tui` - Launch the TUI
pub mod cli;

/// Network reachability checks run before each load.
pub mod connectivity;

/// Core domain model: the immutable [`Article`](domain::Article).
pub mod domain;

/// HTTP fetching and request composition.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for fetching a URL as text
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ArticleQuery`](fetcher::ArticleQuery): search request parameters
pub mod fetcher;

/// Single-flight background loading.
///
/// [`ArticleLoader`](loader::ArticleLoader) runs fetch and normalize on a
/// tokio task and delivers only the result of the most recent start to a
/// [`LoaderListener`](loader::LoaderListener).
pub mod loader;

/// Search response parsing.
pub mod normalizer;

/// Terminal user interface.
///
/// Article list, detail pane and status bar built with ratatui.
///
/// Keybindings: j/k navigate, o opens in browser, r refreshes,
/// s cycles sort order, +/- change page size, q quits.
pub mod tui;
