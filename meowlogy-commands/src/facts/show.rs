use meowlogy_core::{Context, Error};

use crate::api_failure;

pub async fn show(ctx: &Context<'_>, id: &str) -> Result<(), Error> {
    ctx.require_session()?;

    let fact = ctx.data.api.fact_by_id(id).await.map_err(api_failure)?;
    ctx.say(&fact.fact)?;

    if let Some(id) = fact.id.as_deref() {
        ctx.say(format!("  id:      {id}"))?;
    }
    if let Some(likes) = fact.likes_count {
        ctx.say(format!("  likes:   {likes}"))?;
    }
    if let Some(created_at) = fact.created_at.as_deref() {
        ctx.say(format!("  created: {created_at}"))?;
    }
    Ok(())
}
