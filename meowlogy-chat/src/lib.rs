pub mod assembler;
pub mod conversation;
pub mod decoder;
pub mod error;
pub mod state;
pub mod welcome;

pub use assembler::{AskOutcome, ChatAssembler, ChatTransport};
pub use conversation::{ChatMessage, ConversationLog, Sender};
pub use error::ChatError;
pub use state::ChatState;
