use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }

    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered chat history. Messages are append-only except for the text of an
/// AI message, which the assembler rewrites while its answer streams in.
#[derive(Clone, Debug)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn seeded(welcome: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::ai(welcome)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub(crate) fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Overwrite the text of the AI message at `index`. User messages are never touched.
    pub(crate) fn set_text(&mut self, index: usize, text: String) -> bool {
        match self.messages.get_mut(index) {
            Some(message) if message.sender == Sender::Ai => {
                message.text = text;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn reset(&mut self, welcome: impl Into<String>) {
        self.messages.clear();
        self.messages.push(ChatMessage::ai(welcome));
    }
}
