mod gpt_bot;
mod screen;

use anyhow::Result;
use async_trait::async_trait;

pub use gpt_bot::Bot;
pub use screen::{screen_answer, ERROR_REPLY, NO_ANSWER_REPLY};

/// Answers one question in isolation.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String>;
}
