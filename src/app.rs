// Main application state and view routing

use crate::api::{NewService, ServiceApi};
use crate::error::Result;
use crate::events::{key_event_to_action, spawn_message_expiry, Action, AppEvent};
use crate::message::{MessageBoard, Severity};
use crate::sync::{DeleteGate, CONFIRM_DELETE, SELECT_AT_LEAST_ONE};
use crate::ui::{AddServiceForm, ConfirmDialog, ConfirmOutcome, DashboardState, HelpState};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Application views. The dashboard state lives on [`App`] so selections
/// survive a trip through the form or the help screen.
#[derive(Debug)]
pub enum View {
    Dashboard,
    AddService(AddServiceForm),
    Help(HelpState),
}

/// Main application state
pub struct App {
    pub view: View,
    pub dashboard: DashboardState,
    pub confirm: Option<ConfirmDialog>,
    pub messages: MessageBoard,
    pub should_quit: bool,
    pub needs_full_redraw: bool,
    api: Arc<dyn ServiceApi>,
    tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(api: Arc<dyn ServiceApi>, tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            view: View::Dashboard,
            dashboard: DashboardState::new(),
            confirm: None,
            messages: MessageBoard::default(),
            should_quit: false,
            needs_full_redraw: true,
            api,
            tx,
        }
    }

    pub fn with_dashboard(mut self, dashboard: DashboardState) -> Self {
        self.dashboard = dashboard;
        self
    }

    pub fn with_messages(mut self, messages: MessageBoard) -> Self {
        self.messages = messages;
        self
    }

    pub async fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Input(crossterm_event) => {
                self.handle_input(crossterm_event)?;
            }
            AppEvent::Tick => {
                self.refresh();
            }
            AppEvent::ServicesLoaded(Ok(services)) => {
                let summary = self.dashboard.set_services(services);
                if !summary.is_noop() {
                    tracing::info!(
                        "Service list changed: {} added, {} removed",
                        summary.added,
                        summary.removed.len()
                    );
                }
            }
            AppEvent::ServicesLoaded(Err(err)) => {
                tracing::error!("Failed to load services: {}", err);
                self.set_message(format!("Could not load services: {}", err.user_message()), Severity::Error);
            }
            AppEvent::ServiceAdded { name, outcome } => {
                match outcome {
                    Ok(reply) => {
                        tracing::info!("Service '{}' submitted: {}", name, reply);
                        self.set_message(reply, Severity::Info);
                    }
                    Err(err) => {
                        tracing::error!("Failed to add service '{}': {}", name, err);
                        self.set_message(err.user_message(), Severity::Error);
                    }
                }
                self.refresh();
            }
            AppEvent::ServicesDeleted { count, outcome } => {
                match outcome {
                    Ok(reply) => {
                        tracing::info!("Delete of {} service(s) answered: {}", count, reply);
                        self.set_message(reply, Severity::Info);
                    }
                    Err(err) => {
                        tracing::error!("Failed to delete {} service(s): {}", count, err);
                        self.set_message(err.user_message(), Severity::Error);
                    }
                }
                self.refresh();
            }
            AppEvent::MessageExpired(id) => {
                self.messages.expire(id);
            }
            AppEvent::Quit => {
                self.should_quit = true;
            }
        }

        Ok(())
    }

    /// Fetch the service list in the background; the result comes back as
    /// [`AppEvent::ServicesLoaded`]. Overlapping fetches are not coalesced.
    pub fn refresh(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = api.list_services().await;
            tx.send(AppEvent::ServicesLoaded(outcome)).await.ok();
        });
    }

    /// Validate an add request against the table and send it.
    /// Returns false when the request was rejected locally.
    pub fn submit_add(&mut self, name: &str, url: &str) -> bool {
        let service = match self.dashboard.table.validate_new(name, url) {
            Ok(service) => service,
            Err(duplicate) => {
                tracing::debug!("Rejected add of '{}': {}", name.trim(), duplicate);
                self.set_message(duplicate.to_string(), Severity::Error);
                return false;
            }
        };

        self.spawn_create(service);
        true
    }

    fn spawn_create(&self, service: NewService) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = api.create_service(&service).await;
            tx.send(AppEvent::ServiceAdded { name: service.name, outcome }).await.ok();
        });
    }

    /// Open the confirmation dialog for the selected rows.
    /// Returns false when nothing is selected.
    pub fn request_delete(&mut self) -> bool {
        match self.dashboard.table.delete_gate() {
            DeleteGate::NothingSelected => {
                self.set_message(SELECT_AT_LEAST_ONE, Severity::Info);
                false
            }
            DeleteGate::Confirm(urls) => {
                self.confirm = Some(ConfirmDialog::new(CONFIRM_DELETE, urls));
                true
            }
        }
    }

    /// Send the delete request for urls the user confirmed
    pub fn confirm_delete(&mut self, urls: Vec<String>) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = api.delete_services(&urls).await;
            tx.send(AppEvent::ServicesDeleted { count: urls.len(), outcome }).await.ok();
        });
    }

    /// Show a status message and arm its expiry timer
    pub fn set_message(&mut self, text: impl Into<String>, severity: Severity) {
        let id = self.messages.set(text, severity);
        spawn_message_expiry(self.tx.clone(), id, self.messages.timeout());
    }

    fn open_form(&mut self) {
        self.needs_full_redraw = true;
        self.view = View::AddService(AddServiceForm::new());
    }

    fn close_form(&mut self) {
        self.needs_full_redraw = true;
        self.view = View::Dashboard;
    }

    fn submit_form(&mut self) {
        let View::AddService(form) = &mut self.view else {
            return;
        };

        if let Err(e) = form.validate() {
            form.set_error(e);
            return;
        }

        let (name, url) = (form.name.clone(), form.url.clone());
        if self.submit_add(&name, &url) {
            self.close_form();
        }
    }

    fn handle_input(&mut self, event: CrosstermEvent) -> Result<()> {
        let CrosstermEvent::Key(key_event) = event else {
            return Ok(());
        };

        if key_event.kind == KeyEventKind::Release {
            return Ok(());
        }

        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            self.should_quit = true;
            return Ok(());
        }

        // The confirmation dialog captures every key until answered
        if let Some(dialog) = &self.confirm {
            match dialog.handle_action(&key_event_to_action(key_event)) {
                ConfirmOutcome::Confirmed(urls) => {
                    self.confirm = None;
                    self.confirm_delete(urls);
                }
                ConfirmOutcome::Declined => {
                    self.confirm = None;
                }
                ConfirmOutcome::Pending => {}
            }
            return Ok(());
        }

        if matches!(self.view, View::AddService(_)) {
            self.handle_form_key(key_event);
            return Ok(());
        }

        let action = key_event_to_action(key_event);

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ShowHelp | Action::GoBack if matches!(self.view, View::Help(_)) => {
                self.needs_full_redraw = true;
                self.view = View::Dashboard;
            }
            Action::ShowHelp => {
                self.needs_full_redraw = true;
                self.view = View::Help(HelpState::new());
            }
            _ if matches!(self.view, View::Help(_)) => {}
            Action::AddService => {
                self.open_form();
            }
            Action::DeleteSelected => {
                self.request_delete();
            }
            Action::Refresh => {
                self.set_message("Refreshing service list...", Severity::Plain);
                self.refresh();
            }
            other => {
                self.dashboard.handle_action(other);
            }
        }

        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if key_event_to_action(key) == Action::SubmitForm {
            self.submit_form();
            return;
        }

        let View::AddService(form) = &mut self.view else {
            return;
        };

        // AltGr arrives as Ctrl+Alt, so any modifier combination may carry text
        match key.code {
            KeyCode::Char(c) => form.handle_key(c),
            KeyCode::Backspace => form.handle_key('\x7f'),
            KeyCode::Tab | KeyCode::Enter => form.handle_key('\n'),
            KeyCode::Up => form.handle_special_key("up"),
            KeyCode::Down => form.handle_special_key("down"),
            KeyCode::Esc => self.close_form(),
            _ => {}
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Reserve space for the status message if present
        let (content_area, status_area) = if self.messages.current().is_some() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        match &mut self.view {
            View::Dashboard => {
                self.dashboard.render(frame, content_area, status_area.is_none());
            }
            View::AddService(form) => {
                form.render(frame, content_area);
            }
            View::Help(help) => {
                help.render(frame, content_area);
            }
        }

        if let Some(dialog) = &self.confirm {
            dialog.render(frame, content_area);
        }

        if let (Some(status_area), Some(message)) = (status_area, self.messages.current()) {
            let style = message
                .severity
                .color()
                .map(|color| Style::default().fg(color))
                .unwrap_or_default();

            let status_line = Line::from(vec![
                Span::styled(message.severity.prefix(), style.add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::styled(message.text.clone(), style),
            ]);

            let status_bar = Paragraph::new(status_line)
                .block(Block::default().borders(Borders::ALL).title(" Status ").border_style(style))
                .wrap(Wrap { trim: true });

            frame.render_widget(status_bar, status_area);
        }
    }
}
