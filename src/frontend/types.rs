use chrono::{DateTime, Local};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Local>,
}

impl Message {
    pub fn new(sender: Sender, text: String) -> Message {
        Message {
            sender,
            text,
            sent_at: Local::now(),
        }
    }

    pub fn time_label(&self) -> String {
        self.sent_at.format("%H:%M").to_string()
    }
}
