use meowlogy_core::{Context, Error};
use meowlogy_session::impls::auth;

pub async fn logout(ctx: &mut Context<'_>) -> Result<(), Error> {
    let was_signed_in = ctx.session.is_authenticated();
    ctx.session = auth::logout(&ctx.data.store).await?;

    if was_signed_in {
        ctx.say("Logged out.")
    } else {
        ctx.say("You were not logged in.")
    }
}
