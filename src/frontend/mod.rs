mod app;
mod components;
pub mod transport;
pub mod types;
pub mod widget;

pub use app::{app, AppProps};
pub use transport::{ChatBackend, HttpBackend};
pub use types::{Message, Sender};
pub use widget::{key_action, ChatWidget, KeyAction, FALLBACK_REPLY};
