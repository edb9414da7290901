use meowlogy_core::{Context, Error};

use crate::api_failure;

/// Reports collaborator health. Works without logging in.
pub async fn health(ctx: &Context<'_>) -> Result<(), Error> {
    let status = ctx.data.api.health().await.map_err(api_failure)?;

    ctx.say(format!("api:        {}", ctx.data.api.base_url()))?;
    for (label, value) in [
        ("status", &status.status),
        ("database", &status.database),
        ("backend", &status.backend),
        ("ai service", &status.ai_service),
    ] {
        if !value.is_empty() {
            ctx.say(format!("{:<11} {}", format!("{label}:"), value))?;
        }
    }
    Ok(())
}
