//! Keybinding configuration for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Configuration for all keybindings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
    pub open_in_browser: Vec<String>,
    pub refresh: Vec<String>,
    pub cycle_order: Vec<String>,
    pub more_per_page: Vec<String>,
    pub fewer_per_page: Vec<String>,
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: vec!["q".to_string(), "Ctrl+c".to_string()],
            move_up: vec!["k".to_string(), "Up".to_string()],
            move_down: vec!["j".to_string(), "Down".to_string()],
            page_up: vec!["p".to_string(), "PageUp".to_string()],
            page_down: vec!["n".to_string(), "PageDown".to_string()],
            open_in_browser: vec!["o".to_string(), "Enter".to_string()],
            refresh: vec!["r".to_string(), "F5".to_string()],
            cycle_order: vec!["s".to_string()],
            more_per_page: vec!["+".to_string(), "=".to_string()],
            fewer_per_page: vec!["-".to_string()],
        }
    }
}

impl KeybindingConfig {
    /// Get the action for a key event.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 10] = [
            (self.quit.as_slice(), Action::Quit),
            (self.move_up.as_slice(), Action::MoveUp),
            (self.move_down.as_slice(), Action::MoveDown),
            (self.page_up.as_slice(), Action::PageUp),
            (self.page_down.as_slice(), Action::PageDown),
            (self.open_in_browser.as_slice(), Action::OpenInBrowser),
            (self.refresh.as_slice(), Action::Refresh),
            (self.cycle_order.as_slice(), Action::CycleOrder),
            (self.more_per_page.as_slice(), Action::MorePerPage),
            (self.fewer_per_page.as_slice(), Action::FewerPerPage),
        ];

        table
            .iter()
            .find(|(bindings, _)| self.matches_key(key, bindings))
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }

    fn matches_key(&self, key: &KeyEvent, bindings: &[String]) -> bool {
        bindings.iter().any(|binding| {
            parse_key_string(binding)
                .map(|parsed| parsed.matches(key))
                .unwrap_or(false)
        })
    }

    /// Short help text built from the first binding of each action.
    pub fn help_line(&self) -> String {
        fn first(bindings: &[String]) -> &str {
            bindings.first().map(String::as_str).unwrap_or("")
        }

        format!(
            "{}/{}:Move  {}:Open  {}:Refresh  {}:Order  {}/{}:Count  {}:Quit",
            first(&self.move_down),
            first(&self.move_up),
            first(&self.open_in_browser),
            first(&self.refresh),
            first(&self.cycle_order),
            first(&self.more_per_page),
            first(&self.fewer_per_page),
            first(&self.quit),
        )
    }
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Check if this binding matches a key event.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse a key string into a KeyBinding.
///
/// Supported formats:
/// - Single characters: "a", "A", "1", "/"
/// - Special keys: "Enter", "Tab", "BackTab", "Backspace", "Delete", "Home", "End",
///   "PageUp", "PageDown", "Up", "Down", "Left", "Right", "Esc", "Space", "F1"-"F12"
/// - With modifiers: "Ctrl+c", "Shift+Tab", "Alt+Enter", "Ctrl+Shift+a"
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();

    // A trailing "+" is the plus key itself, as in "+" or "Ctrl++".
    let (modifier_part, key_part) = if s == "+" {
        ("", s)
    } else if let Some(prefix) = s.strip_suffix("++") {
        (prefix, "+")
    } else {
        s.rsplit_once('+').unwrap_or(("", s))
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in modifier_part.split('+').filter(|p| !p.is_empty()) {
        match part.to_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyBinding { code, modifiers })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    // Check for single character
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    // Check for special keys (case-insensitive)
    match s.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        "f1" => Ok(KeyCode::F(1)),
        "f2" => Ok(KeyCode::F(2)),
        "f3" => Ok(KeyCode::F(3)),
        "f4" => Ok(KeyCode::F(4)),
        "f5" => Ok(KeyCode::F(5)),
        "f6" => Ok(KeyCode::F(6)),
        "f7" => Ok(KeyCode::F(7)),
        "f8" => Ok(KeyCode::F(8)),
        "f9" => Ok(KeyCode::F(9)),
        "f10" => Ok(KeyCode::F(10)),
        "f11" => Ok(KeyCode::F(11)),
        "f12" => Ok(KeyCode::F(12)),
        _ => Err(format!("Unknown key: {}", s)),
    }
}
