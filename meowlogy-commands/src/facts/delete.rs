use meowlogy_core::{Context, Error};
use tracing::info;

use crate::api_failure;
use crate::facts::like::report;

pub async fn delete(ctx: &Context<'_>, id: &str) -> Result<(), Error> {
    let username = ctx.require_session()?;

    let response = ctx.data.api.delete_fact(id).await.map_err(api_failure)?;
    if response.success {
        info!(username = %username, id = %id.trim(), "fact deleted");
    }
    report(ctx, &response, "Fact deleted.")
}
