// Event handling for the TUI application

use crate::api::ServiceRecord;
use crate::error::ApiResult;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// Outcome of `GET /service`
    ServicesLoaded(ApiResult<Vec<ServiceRecord>>),

    /// Outcome of `POST /service`
    ServiceAdded { name: String, outcome: ApiResult<String> },

    /// Outcome of `DELETE /service`
    ServicesDeleted { count: usize, outcome: ApiResult<String> },

    /// The status message with this id has been shown long enough
    MessageExpired(u64),

    /// Periodic tick for refresh
    Tick,

    /// User input event
    Input(CrosstermEvent),

    /// Request to quit
    Quit,
}

/// User actions derived from input events
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,
    ToggleSelect,
    Select,
    GoBack,
    Refresh,
    AddService,
    DeleteSelected,
    SubmitForm,
    ConfirmAction,
    CancelAction,
    ShowHelp,
    None,
}

/// Convert keyboard input to actions
pub fn key_event_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Navigation
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MoveDown,
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::MoveTop,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::MoveBottom,

        // Selection
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::ToggleSelect,
        (KeyCode::Enter, _) => Action::Select,
        (KeyCode::Esc, _) => Action::GoBack,

        // Service list operations
        (KeyCode::Char('a'), KeyModifiers::NONE) => Action::AddService,
        (KeyCode::Char('d'), KeyModifiers::NONE) | (KeyCode::Delete, _) => Action::DeleteSelected,
        (KeyCode::Char('r'), KeyModifiers::NONE) | (KeyCode::F(5), _) => Action::Refresh,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::SubmitForm,

        // Confirmation
        (KeyCode::Char('y'), KeyModifiers::NONE) => Action::ConfirmAction,
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::CancelAction,

        (KeyCode::Char('?'), KeyModifiers::NONE) => Action::ShowHelp,

        _ => Action::None,
    }
}

/// Spawn input event handler task
pub async fn spawn_input_handler(tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        loop {
            if crossterm::event::poll(Duration::from_millis(100)).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    if tx.send(AppEvent::Input(event)).await.is_err() {
                        break;
                    }
                }
            }
        }
    });
}

/// Spawn periodic tick task. The first tick fires immediately.
pub async fn spawn_ticker(tx: mpsc::Sender<AppEvent>, interval: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        loop {
            interval.tick().await;
            if tx.send(AppEvent::Tick).await.is_err() {
                break;
            }
        }
    });
}

/// Arm the expiry timer for a status message
pub fn spawn_message_expiry(tx: mpsc::Sender<AppEvent>, id: u64, after: Duration) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        tx.send(AppEvent::MessageExpired(id)).await.ok();
    });
}
