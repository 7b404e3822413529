// UI module - TUI components

pub mod add_service;
pub mod confirm;
pub mod dashboard;
pub mod help;
pub mod styles;


pub use add_service::AddServiceForm;
pub use confirm::{ConfirmDialog, ConfirmOutcome};
pub use dashboard::DashboardState;
pub use help::HelpState;
pub use styles::*;
