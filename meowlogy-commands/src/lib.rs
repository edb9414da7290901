pub mod auth;
pub mod chat;
pub mod facts;

use meowlogy_api::ApiError;
use meowlogy_core::Error;

/// Wraps an API failure so its top-level message is the one meant for users.
pub(crate) fn api_failure(err: ApiError) -> Error {
    let message = err.user_message();
    Error::new(err).context(message)
}
