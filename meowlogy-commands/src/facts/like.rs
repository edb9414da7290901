use meowlogy_api::model::ActionResponse;
use meowlogy_core::{Context, Error};

use crate::api_failure;

pub async fn like(ctx: &Context<'_>, id: &str) -> Result<(), Error> {
    ctx.require_session()?;
    let response = ctx.data.api.like_fact(id).await.map_err(api_failure)?;
    report(ctx, &response, "Liked.")
}

pub async fn unlike(ctx: &Context<'_>, id: &str) -> Result<(), Error> {
    ctx.require_session()?;
    let response = ctx.data.api.unlike_fact(id).await.map_err(api_failure)?;
    report(ctx, &response, "Like removed.")
}

/// Prints the server's message, or `fallback` when it sent none.
pub(crate) fn report(
    ctx: &Context<'_>,
    response: &ActionResponse,
    fallback: &str,
) -> Result<(), Error> {
    let message = match response.message.trim() {
        "" => fallback,
        message => message,
    };

    if response.success {
        ctx.say(message)
    } else {
        Err(anyhow::anyhow!("{message}"))
    }
}
