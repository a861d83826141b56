use anyhow::Result;
use dioxus::html::input_data::keyboard_types::{Key, Modifiers};

use super::transport::ChatBackend;
use super::types::{Message, Sender};

pub const FALLBACK_REPLY: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Submit the draft; the key's default newline is dropped.
    Submit,
    /// Let the key edit the draft.
    Edit,
}

/// Plain Enter submits. Enter with Shift, Ctrl, Alt or Meta is an edit.
pub fn key_action(key: &Key, modifiers: Modifiers) -> KeyAction {
    let held = Modifiers::SHIFT | Modifiers::CONTROL | Modifiers::ALT | Modifiers::META;
    match key {
        Key::Enter if !modifiers.intersects(held) => KeyAction::Submit,
        _ => KeyAction::Edit,
    }
}

/// State behind the chat box: the transcript, the draft, and the send lock.
#[derive(Default)]
pub struct ChatWidget {
    messages: Vec<Message>,
    draft: String,
    send_lock: bool,
    /// Set by Enter with a modifier. The browser follows that key with an
    /// implicit form submit, which must not send the draft.
    skip_submit: bool,
}

impl ChatWidget {
    pub fn new() -> ChatWidget {
        ChatWidget::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: String) {
        self.draft = draft;
        self.skip_submit = false;
    }

    /// True while the loading placeholder should be shown.
    pub fn is_loading(&self) -> bool {
        self.send_lock
    }

    /// Takes the trimmed draft, records it as a user message, clears the
    /// input and raises the placeholder. Returns the text to send, or `None`
    /// when the draft is blank or a request is still in flight.
    pub fn begin(&mut self) -> Option<String> {
        if self.send_lock {
            tracing::debug!("submission ignored, a request is still in flight");
            return None;
        }
        let message = self.draft.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();

        self.messages.push(Message::new(Sender::User, message.clone()));
        self.draft.clear();
        self.send_lock = true;
        tracing::debug!(len = message.len(), "submitting message");
        Some(message)
    }

    /// Keydown in the input. Plain Enter submits.
    pub fn on_key(&mut self, key: &Key, modifiers: Modifiers) -> Option<String> {
        match key_action(key, modifiers) {
            KeyAction::Submit => {
                self.skip_submit = false;
                self.begin()
            }
            KeyAction::Edit => {
                self.skip_submit = *key == Key::Enter;
                None
            }
        }
    }

    /// Submit event on the form, from the send button or implicit submission.
    pub fn on_form_submit(&mut self) -> Option<String> {
        if std::mem::take(&mut self.skip_submit) {
            tracing::debug!("form submit after modified Enter ignored");
            return None;
        }
        self.begin()
    }

    /// Drops the placeholder and appends the reply, or the apology if the
    /// request failed in any way.
    pub fn finish(&mut self, reply: Result<String>) {
        self.send_lock = false;
        let text = reply.unwrap_or_else(|err| {
            tracing::error!("chat request failed: {err:#}");
            FALLBACK_REPLY.to_string()
        });
        self.messages.push(Message::new(Sender::Bot, text));
    }

    /// Form submit followed by the request. Returns whether a request was made.
    pub async fn submit(&mut self, backend: &dyn ChatBackend) -> bool {
        let outgoing = self.on_form_submit();
        self.deliver(outgoing, backend).await
    }

    /// Keydown followed by the request, if the key submitted.
    pub async fn press_key(
        &mut self,
        key: &Key,
        modifiers: Modifiers,
        backend: &dyn ChatBackend,
    ) -> bool {
        let outgoing = self.on_key(key, modifiers);
        self.deliver(outgoing, backend).await
    }

    async fn deliver(&mut self, outgoing: Option<String>, backend: &dyn ChatBackend) -> bool {
        let Some(message) = outgoing else {
            return false;
        };
        let reply = backend.send(&message).await;
        self.finish(reply);
        true
    }
}
