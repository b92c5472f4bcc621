use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::domain::Article;
use crate::tui::app::TuiApp;

/// Rows each article occupies in the list.
pub const ARTICLE_HEIGHT: u16 = 2;

pub fn render(frame: &mut Frame, app: &TuiApp, help: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Articles pane
            Constraint::Length(6), // Detail pane
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_articles_pane(frame, app, chunks[0]);
    render_detail_pane(frame, app, chunks[1]);
    render_status_bar(frame, app, help, chunks[2]);
}

/// Number of articles visible at once in a pane of `height` rows.
pub fn visible_articles(height: u16) -> usize {
    (height.saturating_sub(2) / ARTICLE_HEIGHT).max(1) as usize
}

fn render_articles_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let title = format!(
        " World Cup news ({}) · {} · {} per page ",
        app.articles.len(),
        app.settings.order_by,
        app.settings.articles_count
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if app.articles.is_empty() {
        let message = if app.is_loading {
            "Loading articles..."
        } else {
            app.empty_message.unwrap_or("")
        };

        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app.articles.iter().map(article_item).collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::Cyan)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default().with_selected(Some(app.article_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn article_item(article: &Article) -> ListItem<'_> {
    let mut meta = article.byline();
    if let (Some(date), Some(time)) = (article.formatted_date(), article.formatted_time()) {
        meta.push_str(&format!(" · {} {}", date, time));
    }

    ListItem::new(Text::from(vec![
        Line::from(Span::styled(
            article.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", meta),
            Style::default().fg(Color::Yellow),
        )),
    ]))
}

fn render_detail_pane(frame: &mut Frame, app: &TuiApp, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let content = match app.selected_article() {
        Some(article) => {
            let when = match (article.formatted_date(), article.formatted_time()) {
                (Some(date), Some(time)) => format!("{} at {}", date, time),
                _ => article.publish_date().to_string(),
            };

            Text::from(vec![
                Line::from(Span::styled(
                    article.title(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(format!("{} · {}", article.byline(), when)),
                Line::from(Span::styled(
                    article.url(),
                    Style::default().fg(Color::Blue),
                )),
            ])
        }
        None => Text::from("No article selected"),
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, help: &str, area: Rect) {
    let status = if app.is_loading {
        "Fetching articles...".to_string()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        help.to_string()
    };

    let paragraph =
        Paragraph::new(status).style(Style::default().fg(Color::White).bg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}
