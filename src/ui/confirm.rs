// Delete confirmation dialog

use crate::events::Action;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmDialog {
    pub message: String,
    /// Urls that will be sent if the user agrees
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Confirmed(Vec<String>),
    Declined,
    Pending,
}

impl ConfirmDialog {
    pub fn new(message: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            message: message.into(),
            urls,
        }
    }

    pub fn handle_action(&self, action: &Action) -> ConfirmOutcome {
        match action {
            Action::ConfirmAction | Action::Select => ConfirmOutcome::Confirmed(self.urls.clone()),
            Action::CancelAction | Action::GoBack | Action::Quit => ConfirmOutcome::Declined,
            _ => ConfirmOutcome::Pending,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let dialog_width = 64.min(area.width.saturating_sub(4));
        let dialog_height = 8.min(area.height.saturating_sub(4));

        let dialog_area = Rect {
            x: area.x + (area.width - dialog_width) / 2,
            y: area.y + (area.height - dialog_height) / 2,
            width: dialog_width,
            height: dialog_height,
        };

        frame.render_widget(Clear, dialog_area);

        let noun = if self.urls.len() == 1 { "service" } else { "services" };
        let dialog = Paragraph::new(format!(
            "{}\n({} {})\n\n[y/Enter] Yes  [n/Esc] No",
            self.message,
            self.urls.len(),
            noun
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm delete ")
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().bg(Color::Black).fg(Color::White)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

        frame.render_widget(dialog, dialog_area);
    }
}
