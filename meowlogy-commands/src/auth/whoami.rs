use meowlogy_core::{Context, Error};

pub fn whoami(ctx: &Context<'_>) -> Result<(), Error> {
    match (ctx.session.username(), ctx.session.user_id()) {
        (Some(username), Some(id)) => ctx.say(format!("{username} (id {id})")),
        (Some(username), None) => ctx.say(username),
        (None, _) => ctx.say("Not logged in."),
    }
}
