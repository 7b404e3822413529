// Transient status message shown under the table

use ratatui::style::Color;
use std::time::Duration;

/// How long a message stays on screen
pub const MESSAGE_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
    /// Rendered in the terminal's default color
    Plain,
}

impl Severity {
    pub fn color(&self) -> Option<Color> {
        match self {
            Severity::Info => Some(crate::ui::SUCCESS),
            Severity::Error => Some(crate::ui::ERROR),
            Severity::Plain => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Severity::Info => "✓",
            Severity::Error => "✗",
            Severity::Plain => "ℹ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub id: u64,
    pub text: String,
    pub severity: Severity,
}

/// Holds at most one message. Every message gets a fresh id so an expiry
/// timer armed for an older message cannot clear a newer one.
#[derive(Debug)]
pub struct MessageBoard {
    current: Option<StatusMessage>,
    next_id: u64,
    timeout: Duration,
}

impl Default for MessageBoard {
    fn default() -> Self {
        Self::new(MESSAGE_TIMEOUT)
    }
}

impl MessageBoard {
    pub fn new(timeout: Duration) -> Self {
        Self {
            current: None,
            next_id: 1,
            timeout,
        }
    }

    /// Replace the current message, returning the id its expiry timer should carry
    pub fn set(&mut self, text: impl Into<String>, severity: Severity) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.current = Some(StatusMessage {
            id,
            text: text.into(),
            severity,
        });
        id
    }

    /// Clear the message if it is still the one with `id`
    pub fn expire(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|m| m.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
