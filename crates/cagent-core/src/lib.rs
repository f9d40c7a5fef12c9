pub mod api;
pub mod command;
pub mod config;
pub mod controller;
pub mod format;
pub mod i18n;
pub mod state;

// Re-export main types for convenience
pub use api::{ApiError, Backend, HttpBackend};
pub use command::{execute, Command, Completion};
pub use config::Config;
pub use controller::ViewController;
pub use i18n::{InputField, LabelKey, Language, Message};
pub use state::{AppState, ChatMessage, ChatRole, Panel, Severity, SlotId, Theme};
