use meowlogy_core::{Context, Error};
use meowlogy_session::impls::auth::{self, AuthError};
use tracing::info;

pub async fn login(ctx: &mut Context<'_>, username: &str, password: &str) -> Result<(), Error> {
    let session = match auth::login(
        &ctx.data.store,
        &ctx.data.credentials,
        username,
        password,
    )
    .await
    {
        Ok(session) => session,
        Err(AuthError::Store(err)) => return Err(err.context("could not save the session")),
        Err(err) => return Err(err.into()),
    };

    let greeting = format!("Logged in as {}.", session.username().unwrap_or_default());
    info!(backend = ctx.data.store.backend_name(), "logged in");
    ctx.session = session;
    ctx.say(greeting)
}
