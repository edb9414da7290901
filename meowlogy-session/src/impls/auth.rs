use meowlogy_utils::validation::{self, ValidationError};

use crate::impls::session::{clear_session, save_session};
use crate::model::credentials::DemoCredentials;
use crate::model::session::Session;
use crate::store::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Checks the input against the demo credential and persists the session on a match.
///
/// Only the presence of a password is checked here; the length rule applies
/// when choosing a password at signup.
pub async fn login(
    store: &SessionStore,
    credentials: &DemoCredentials,
    username: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let username = validation::validate_username(username)?;
    validation::validate_password_present(password)?;

    if !credentials.matches(&username, password) {
        tracing::info!(username = %username, "login rejected");
        return Err(AuthError::InvalidCredentials);
    }

    let session = Session::Authenticated {
        username,
        user_id: None,
    };
    save_session(store, &session).await?;

    Ok(session)
}

pub async fn logout(store: &SessionStore) -> anyhow::Result<Session> {
    clear_session(store).await?;
    Ok(Session::Anonymous)
}
