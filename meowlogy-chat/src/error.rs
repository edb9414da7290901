use meowlogy_utils::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("a question is already being answered")]
    Busy,

    #[error("cannot {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}
