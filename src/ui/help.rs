// Help view implementation

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Default)]
pub struct HelpState;

impl HelpState {
    pub fn new() -> Self {
        Self
    }

    fn section(title: &str) -> Line<'_> {
        Line::from(vec![
            Span::styled(title, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(": "),
        ])
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Content
                Constraint::Length(1), // Footer
            ])
            .split(area);

        let header = Paragraph::new("Svcpoll Help")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(header, chunks[0]);

        let help_content = vec![
            Self::section("Navigation"),
            Line::from("  ↑/↓ or j/k    - Move up/down"),
            Line::from("  g/G           - Jump to top/bottom"),
            Line::from("  Esc           - Go back"),
            Line::from(""),
            Self::section("Services"),
            Line::from("  Space/Enter   - Select or unselect the service under the cursor"),
            Line::from("  a             - Add a service"),
            Line::from("  d/Delete      - Delete the selected services"),
            Line::from("  r/F5          - Refresh now (the list also refreshes on a timer)"),
            Line::from(""),
            Self::section("Add form"),
            Line::from("  Tab/Enter/↑↓  - Switch field"),
            Line::from("  Ctrl+S        - Submit"),
            Line::from("  Esc           - Cancel"),
            Line::from(""),
            Self::section("General"),
            Line::from("  ?             - Show this help"),
            Line::from("  q/Ctrl+C      - Quit"),
        ];

        let help_paragraph = Paragraph::new(help_content)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Keyboard Shortcuts"));

        frame.render_widget(help_paragraph, chunks[1]);

        let footer = Paragraph::new("Esc to return")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);

        frame.render_widget(footer, chunks[2]);
    }
}
