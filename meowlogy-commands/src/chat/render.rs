use chrono::Local;
use meowlogy_chat::{ChatMessage, ConversationLog, Sender};
use meowlogy_utils::formatting::{format_clock, transcript_line};
use meowlogy_utils::stream_print::{PrintStep, StreamPrinter};

pub(crate) const AI_SPEAKER: &str = "Cat Care AI";
pub(crate) const USER_SPEAKER: &str = "You";

/// Follows the placeholder of one send and yields the text still to print.
pub(crate) struct AnswerRenderer {
    placeholder: usize,
    printer: StreamPrinter,
}

impl AnswerRenderer {
    /// The placeholder lands right after the user message, so it is one past
    /// the log's current end.
    pub(crate) fn for_next_answer(log: &ConversationLog) -> Self {
        Self {
            placeholder: log.len() + 1,
            printer: StreamPrinter::new(),
        }
    }

    pub(crate) fn update(&mut self, messages: &[ChatMessage]) -> Option<String> {
        let message = messages
            .get(self.placeholder)
            .filter(|message| message.sender == Sender::Ai)?;

        match self.printer.advance(&message.text) {
            PrintStep::Unchanged => None,
            PrintStep::Append(suffix) => Some(suffix),
            PrintStep::Rewrite(text) => Some(format!("\n{text}")),
        }
    }
}

pub(crate) fn speaker(message: &ChatMessage) -> &'static str {
    match message.sender {
        Sender::User => USER_SPEAKER,
        Sender::Ai => AI_SPEAKER,
    }
}

pub(crate) fn history_line(message: &ChatMessage) -> String {
    let clock = format_clock(&message.timestamp.with_timezone(&Local));
    transcript_line(&clock, speaker(message), &message.text)
}
