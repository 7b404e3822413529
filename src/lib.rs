// Svcpoll - Service Poller TUI
// Library root

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod sync;
pub mod ui;
pub mod version;

// Test modules (only compiled during tests)
#[cfg(test)]
mod app_tests;
