//! Session transcript as tagged messages.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub kind: MessageKind,
    pub content: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: MessageKind, content: impl Into<String>) {
        self.messages.push(Message {
            kind,
            content: content.into(),
        });
    }

    /// Forget everything said so far (done on entering a new room).
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent player message, if any.
    pub fn last_user(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.kind == MessageKind::User)
    }
}
