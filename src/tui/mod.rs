//! Terminal User Interface
//!
//! Renders the session with ratatui and turns key presses into session calls

pub mod app;
pub mod widgets;

pub use app::App;

use crate::data::Outcome;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the game
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub border: Color,
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            alert: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            border: Color::DarkGray,
            header: Color::Magenta,
        }
    }
}

/// Get color for an outcome
pub fn outcome_color(outcome: &Outcome) -> Color {
    match outcome {
        Outcome::Success => Color::Green,
        Outcome::Failure => Color::Red,
    }
}

/// Get color for a hope value
pub fn hope_color(hope: u8) -> Color {
    match hope {
        0..=10 => Color::Red,
        11..=35 => Color::Yellow,
        _ => Color::Green,
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// Smaller logo for header
pub const SMALL_LOGO: &str = " CRISIS RESPONSE ";

/// Help text
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════════╗
║                     CONTROLS                      ║
╠═══════════════════════════════════════════════════╣
║  ↑/↓    Choose a solution                         ║
║  1-9    Pick a solution directly                  ║
║  Enter  Confirm / Continue after a result         ║
║  s      Skip this crisis                          ║
║  x      Close the share report                    ║
║  r      Restart from scratch                      ║
║  ?      Toggle this help                          ║
║  q      Quit                                      ║
╚═══════════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),   // Header
            Constraint::Min(10),     // Main content
            Constraint::Length(3),   // Message line
            Constraint::Length(1),   // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Create the crisis card layout (description + solutions)
pub fn create_card_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),  // Title and description
            Constraint::Percentage(55),  // Solutions
        ])
        .split(area)
        .to_vec()
}

/// Centered popup area, clamped to the frame
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
