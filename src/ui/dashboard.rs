// Dashboard view - service table

use crate::api::ServiceRecord;
use crate::events::Action;
use crate::sync::{Reconciliation, RowKey, ServiceTable};
use crate::ui::{checkbox, header_row_style, help_style, selected_style, status_color, status_emoji, title_style};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

#[derive(Debug)]
pub struct DashboardState {
    pub table: ServiceTable,
    pub table_state: TableState,
    pub last_refresh: Option<DateTime<Local>>,
    pub server: String,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            table: ServiceTable::new(),
            table_state,
            last_refresh: None,
            server: String::new(),
        }
    }

    pub fn with_server(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::new()
        }
    }

    /// Reconcile the table with a fresh service list
    pub fn set_services(&mut self, services: Vec<ServiceRecord>) -> Reconciliation {
        let focused = self.selected_key();
        let summary = self.table.reconcile(services);
        self.last_refresh = Some(Local::now());

        // Keep the cursor on the same service if it survived
        match focused.and_then(|key| self.table.position(&key)) {
            Some(index) => self.table_state.select(Some(index)),
            None => self.clamp_selection(),
        }

        summary
    }

    fn clamp_selection(&mut self) {
        let len = self.table.len();
        let current = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(current.min(len.saturating_sub(1))));
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::MoveTop => self.table_state.select(Some(0)),
            Action::MoveBottom => {
                if !self.table.is_empty() {
                    self.table_state.select(Some(self.table.len() - 1));
                }
            }
            Action::ToggleSelect | Action::Select => {
                self.toggle_current();
            }
            _ => {}
        }
    }

    /// Flip the checkbox under the cursor
    pub fn toggle_current(&mut self) -> Option<bool> {
        let index = self.table_state.selected()?;
        self.table.toggle(index)
    }

    fn move_selection(&mut self, delta: isize) {
        if self.table.is_empty() {
            return;
        }

        let current = self.table_state.selected().unwrap_or(0);
        let new_index = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            (current + delta as usize).min(self.table.len() - 1)
        };

        self.table_state.select(Some(new_index));
    }

    pub fn selected_key(&self) -> Option<RowKey> {
        self.table_state
            .selected()
            .and_then(|i| self.table.rows().get(i))
            .map(|row| row.key.clone())
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, show_footer: bool) {
        let mut constraints = vec![
            Constraint::Length(3), // Header
            Constraint::Length(3), // Stats
            Constraint::Min(0),    // Services table
        ];
        if show_footer {
            constraints.push(Constraint::Length(1));
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_stats(frame, chunks[1]);
        self.render_table(frame, chunks[2]);

        if show_footer {
            self.render_help(frame, chunks[3]);
        }
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = Paragraph::new(
            "[Space] Select | [↑↓/jk] Navigate | [a] Add | [d] Delete selected | [r] Refresh | [?] Help | [q] Quit",
        )
        .style(help_style())
        .alignment(Alignment::Center);

        frame.render_widget(help, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let build = crate::version::build_info();
        let version_text = format!("v{}  ", build.version);

        let title = if self.server.is_empty() {
            "⚡ Svcpoll - Service Poller".to_string()
        } else {
            format!("⚡ Svcpoll - Service Poller @ {}", self.server)
        };

        let title_para = Paragraph::new(title)
            .style(title_style())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(title_para, area);

        // Version in the top-right corner, inside the border; needs the full three rows
        if area.height < 3 {
            return;
        }
        let version_area = Rect {
            x: area.x + area.width.saturating_sub(version_text.len() as u16 + 2),
            y: area.y + 1,
            width: (version_text.len() as u16).min(area.width),
            height: 1,
        };

        let version_para = Paragraph::new(version_text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(version_para, version_area);
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let (total, up, down, pending) = self.table.stats();
        let refreshed = self
            .last_refresh
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        let stats_text = format!(
            "Total: {} | OK: {} | FAIL: {} | Unknown: {} | Selected: {} | Last refresh: {}",
            total,
            up,
            down,
            pending,
            self.table.selected_count(),
            refreshed
        );

        let stats = Paragraph::new(stats_text)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));

        frame.render_widget(stats, area);
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .table
            .rows()
            .iter()
            .map(|row| {
                let record = &row.record;
                Row::new(vec![
                    Cell::from(checkbox(row.selected)),
                    Cell::from(record.name.clone()),
                    Cell::from(record.url.clone()),
                    Cell::from(format!("{} {}", status_emoji(&record.status), record.status))
                        .style(Style::default().fg(status_color(&record.status))),
                    Cell::from(record.date.clone()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Percentage(25),
            Constraint::Percentage(40),
            Constraint::Percentage(12),
            Constraint::Percentage(23),
        ];

        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["", "Name", "URL", "Status", "Added"])
                    .style(header_row_style())
                    .bottom_margin(1),
            )
            .block(Block::default().title(" Services ").borders(Borders::ALL))
            .highlight_style(selected_style())
            .highlight_symbol(">> ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }
}
