//! Per-question lifecycle of the chat assembler.
//!
//! Each transition is a plain function from the current state (plus an event)
//! to the next state and the effects the driver must apply. The states carry
//! the placeholder index, so "in flight without a placeholder" cannot be built.

use meowlogy_utils::{
    formatting::apology_after_partial,
    validation::{ValidationError, validate_question},
};

use crate::{conversation::ChatMessage, error::ChatError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatState {
    Idle,
    Validating { input: String },
    Sending { placeholder: usize },
    Streaming { placeholder: usize, answer: String },
    Completed { placeholder: usize },
    Failed { placeholder: usize },
}

/// Work for the driver after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    ClearError,
    ShowError(String),
    /// Surface a validation failure; nothing was appended.
    Reject(ValidationError),
    Append(ChatMessage),
    /// Full replacement of the message text, not a delta.
    SetText { index: usize, text: String },
    Dispatch { question: String },
    ResetLog,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: ChatState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: ChatState) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(next: ChatState, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

impl ChatState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating { .. } => "validating",
            Self::Sending { .. } => "sending",
            Self::Streaming { .. } => "streaming",
            Self::Completed { .. } => "completed",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Index of the AI message being filled in, while one is in flight.
    pub fn placeholder(&self) -> Option<usize> {
        match self {
            Self::Sending { placeholder }
            | Self::Streaming { placeholder, .. }
            | Self::Completed { placeholder }
            | Self::Failed { placeholder } => Some(*placeholder),
            Self::Idle | Self::Validating { .. } => None,
        }
    }

    /// Idle -> Validating. Any other state means a question is still in flight.
    pub fn submit(&self, input: &str) -> Result<Transition, ChatError> {
        match self {
            Self::Idle => Ok(Transition::to(Self::Validating {
                input: input.to_owned(),
            })),
            _ => Err(ChatError::Busy),
        }
    }

    /// Validating -> Sending (user message, empty placeholder, dispatch) or
    /// back to Idle with the rule that failed. `log_len` is the log length
    /// before anything is appended.
    pub fn validate(&self, log_len: usize) -> Result<Transition, ChatError> {
        let Self::Validating { input } = self else {
            return Err(self.invalid("validate"));
        };

        match validate_question(input) {
            Ok(question) => Ok(Transition::with(
                Self::Sending {
                    placeholder: log_len + 1,
                },
                vec![
                    Effect::ClearError,
                    Effect::Append(ChatMessage::user(question.clone())),
                    Effect::Append(ChatMessage::ai("")),
                    Effect::Dispatch { question },
                ],
            )),
            Err(err) => Ok(Transition::with(Self::Idle, vec![Effect::Reject(err)])),
        }
    }

    /// Sending -> Streaming once the response body is open.
    pub fn opened(&self) -> Result<Transition, ChatError> {
        match self {
            Self::Sending { placeholder } => Ok(Transition::to(Self::Streaming {
                placeholder: *placeholder,
                answer: String::new(),
            })),
            _ => Err(self.invalid("open a stream")),
        }
    }

    /// Streaming -> Streaming with `text` appended to the accumulator; the
    /// placeholder is overwritten with the whole accumulator.
    pub fn chunk(&self, text: &str) -> Result<Transition, ChatError> {
        let Self::Streaming {
            placeholder,
            answer,
        } = self
        else {
            return Err(self.invalid("apply a chunk"));
        };

        if text.is_empty() {
            return Ok(Transition::to(self.clone()));
        }

        let mut answer = answer.clone();
        answer.push_str(text);
        Ok(Transition::with(
            Self::Streaming {
                placeholder: *placeholder,
                answer: answer.clone(),
            },
            vec![Effect::SetText {
                index: *placeholder,
                text: answer,
            }],
        ))
    }

    /// Streaming -> Completed. The last chunk already wrote the final text.
    pub fn finish(&self) -> Result<Transition, ChatError> {
        match self {
            Self::Streaming { placeholder, .. } => Ok(Transition::to(Self::Completed {
                placeholder: *placeholder,
            })),
            _ => Err(self.invalid("finish")),
        }
    }

    /// Sending | Streaming -> Failed. The placeholder gets the apology (after
    /// any partial answer) and `reason` is shown as a separate error.
    pub fn fail(&self, reason: &str) -> Result<Transition, ChatError> {
        let (placeholder, partial) = match self {
            Self::Sending { placeholder } => (*placeholder, ""),
            Self::Streaming {
                placeholder,
                answer,
            } => (*placeholder, answer.as_str()),
            _ => return Err(self.invalid("fail")),
        };

        Ok(Transition::with(
            Self::Failed { placeholder },
            vec![
                Effect::SetText {
                    index: placeholder,
                    text: apology_after_partial(partial, reason),
                },
                Effect::ShowError(reason.to_owned()),
            ],
        ))
    }

    /// Completed | Failed -> Idle.
    pub fn settle(&self) -> Result<Transition, ChatError> {
        match self {
            Self::Completed { .. } | Self::Failed { .. } => Ok(Transition::to(Self::Idle)),
            _ => Err(self.invalid("settle")),
        }
    }

    /// Any state -> Idle with the log back to its seed. In-flight work is abandoned.
    pub fn clear(&self) -> Transition {
        Transition::with(Self::Idle, vec![Effect::ResetLog, Effect::ClearError])
    }

    fn invalid(&self, event: &'static str) -> ChatError {
        ChatError::InvalidTransition {
            state: self.name(),
            event,
        }
    }
}
