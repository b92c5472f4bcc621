pub mod app;
pub mod event;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};
use crate::config::{FeedSettings, SettingsHandle};
use crate::loader::ArticleLoader;

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>, settings: SettingsHandle) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, settings).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>, settings: SettingsHandle) -> Result<()> {
    let mut settings_rx = settings.subscribe();
    let mut tui_app = TuiApp::new(settings_rx.borrow_and_update().clone());
    let mut loader = ctx.loader();
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let keybindings = &ctx.config.keybindings;
    let help = keybindings.help_line();

    let initial = tui_app.settings.clone();
    restart_loader(&mut tui_app, &mut loader, &ctx, &initial);

    loop {
        terminal.draw(|frame| layout::render(frame, &tui_app, &help))?;

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let page = layout::visible_articles(terminal.size()?.height.saturating_sub(7));

                match keybindings.get_action(&key) {
                    Action::Quit => {
                        tui_app.should_quit = true;
                    }
                    Action::MoveUp => {
                        tui_app.move_up();
                    }
                    Action::MoveDown => {
                        tui_app.move_down();
                    }
                    Action::PageUp => {
                        tui_app.page_up(page);
                    }
                    Action::PageDown => {
                        tui_app.page_down(page);
                    }
                    Action::OpenInBrowser => {
                        if let Some(article) = tui_app.selected_article() {
                            let url = article.url().to_string();
                            if let Err(e) = open::that(&url) {
                                tui_app.set_status(format!("Failed to open browser: {}", e));
                            }
                        }
                    }
                    Action::Refresh => {
                        let current = settings.current();
                        restart_loader(&mut tui_app, &mut loader, &ctx, &current);
                    }
                    Action::CycleOrder => {
                        settings.cycle_order();
                    }
                    Action::MorePerPage => {
                        settings.step_articles_count(5);
                    }
                    Action::FewerPerPage => {
                        settings.step_articles_count(-5);
                    }
                    Action::None => {}
                }
            }
            AppEvent::Tick => {}
        }

        // Any settings change triggers a full reload.
        if settings_rx.has_changed().unwrap_or(false) {
            let current = settings_rx.borrow_and_update().clone();
            restart_loader(&mut tui_app, &mut loader, &ctx, &current);
        }

        loader.poll_delivery(&mut tui_app);

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

fn restart_loader(
    tui_app: &mut TuiApp,
    loader: &mut ArticleLoader,
    ctx: &AppContext,
    settings: &FeedSettings,
) {
    tui_app.settings = settings.clone();
    tui_app.begin_loading();

    loader.start(&ctx.query(settings));
}
