// Ratatui styling and color palette

use crate::api::models::{STATUS_FAIL, STATUS_OK};
use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const PRIMARY: Color = Color::Cyan;
pub const WARNING: Color = Color::Yellow;
pub const SUCCESS: Color = Color::Green;
pub const ERROR: Color = Color::Red;

// Common styles
pub fn title_style() -> Style {
    Style::default()
        .fg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn help_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

pub fn header_row_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Get color for a poller status
pub fn status_color(status: &str) -> Color {
    if status.eq_ignore_ascii_case(STATUS_OK) {
        SUCCESS
    } else if status.eq_ignore_ascii_case(STATUS_FAIL) {
        ERROR
    } else {
        WARNING
    }
}

/// Get colored emoji for a poller status
pub fn status_emoji(status: &str) -> &'static str {
    if status.eq_ignore_ascii_case(STATUS_OK) {
        "🟢"
    } else if status.eq_ignore_ascii_case(STATUS_FAIL) {
        "🔴"
    } else {
        "⚪"
    }
}

/// Checkbox glyph for a row
pub fn checkbox(selected: bool) -> &'static str {
    if selected {
        "[x]"
    } else {
        "[ ]"
    }
}
