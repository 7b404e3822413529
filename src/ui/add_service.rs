// Add service form

use crate::ui::{help_style, title_style};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use reqwest::Url;

/// Url schemes the poller can check
const ALLOWED_SCHEMES: [&str; 4] = ["http", "https", "ftp", "file"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum FormField {
    Name,
    Url,
}

#[derive(Debug, Clone)]
pub struct AddServiceForm {
    pub name: String,
    pub url: String,

    current_field: FormField,
    error_message: Option<String>,
}

impl Default for AddServiceForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: String::new(),
            current_field: FormField::Name,
            error_message: None,
        }
    }
}

impl AddServiceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: char) {
        self.error_message = None;

        match key {
            '\n' | '\t' => self.next_field(),
            '\x7f' | '\x08' => {
                self.current_value_mut().pop();
            }
            _ if !key.is_control() => self.current_value_mut().push(key),
            _ => {}
        }
    }

    pub fn handle_special_key(&mut self, key: &str) {
        if matches!(key, "up" | "down") {
            self.next_field();
        }
    }

    fn current_value_mut(&mut self) -> &mut String {
        match self.current_field {
            FormField::Name => &mut self.name,
            FormField::Url => &mut self.url,
        }
    }

    fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Name => FormField::Url,
            FormField::Url => FormField::Name,
        };
    }

    /// Form-level checks that run before the service list is consulted
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Please provide a valid service name.".to_string());
        }

        let url = self.url.trim();
        if url.is_empty() {
            return Err("Please provide a valid URL.".to_string());
        }

        let parsed = Url::parse(url).map_err(|_| "Please provide a valid URL.".to_string())?;
        if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
            return Err(format!(
                "Unsupported URL scheme '{}', use one of: {}",
                parsed.scheme(),
                ALLOWED_SCHEMES.join(", ")
            ));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err("Please provide a valid URL.".to_string());
        }

        Ok(())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Form fields
                Constraint::Length(3), // Help/Error
            ])
            .split(area);

        let title = Paragraph::new("📝 Add Service")
            .style(title_style())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let lines = vec![
            self.render_field_label("Name", FormField::Name),
            self.render_field_value(&self.name, FormField::Name, "My service"),
            Line::from(""),
            self.render_field_label("URL", FormField::Url),
            self.render_field_value(&self.url, FormField::Url, "https://www.example.com"),
        ];

        let form = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Form "))
            .wrap(Wrap { trim: false });
        frame.render_widget(form, chunks[1]);

        self.render_footer(frame, chunks[2]);
    }

    fn render_field_label<'a>(&self, label: &'a str, field: FormField) -> Line<'a> {
        let is_current = self.current_field == field;
        let style = if is_current {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        Line::from(vec![
            if is_current {
                Span::styled("▶ ", Style::default().fg(Color::Green))
            } else {
                Span::raw("  ")
            },
            Span::styled(label, style),
        ])
    }

    fn render_field_value(&self, value: &str, field: FormField, placeholder: &str) -> Line<'static> {
        let is_current = self.current_field == field;
        let cursor = if is_current {
            Span::styled("█", Style::default().fg(Color::Green))
        } else {
            Span::raw("")
        };

        let text = if value.is_empty() {
            Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )
        } else if is_current {
            Span::styled(value.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(value.to_string(), Style::default().fg(Color::White))
        };

        Line::from(vec![Span::raw("  "), text, cursor])
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help_text = if let Some(ref error) = self.error_message {
            Line::from(vec![
                Span::styled("Error: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(error.clone(), Style::default().fg(Color::Red)),
            ])
        } else {
            Line::from(vec![
                Span::styled("[Tab/Enter]", Style::default().fg(Color::Cyan)),
                Span::styled(" Next field | ", help_style()),
                Span::styled("[Ctrl+S]", Style::default().fg(Color::Green)),
                Span::styled(" Add | ", help_style()),
                Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
                Span::styled(" Cancel", help_style()),
            ])
        };

        let paragraph = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub fn error(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
