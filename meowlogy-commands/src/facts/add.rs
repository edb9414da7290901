use meowlogy_api::FactBoard;
use meowlogy_core::{Context, Error};
use tracing::info;

use crate::api_failure;
use crate::facts::list::print_facts;

const ADDED_FALLBACK: &str = "Fact added.";

/// Submit a fact, then show the refreshed list when the server accepted it.
pub async fn add(ctx: &Context<'_>, text: &str) -> Result<(), Error> {
    let username = ctx.require_session()?;

    let mut board = FactBoard::new(ctx.data.api.clone());
    let created = board.submit(text).await.map_err(api_failure)?;
    info!(username = %username, status = %created.status, "fact submitted");

    let message = match created.message.trim() {
        "" => ADDED_FALLBACK,
        message => message,
    };
    ctx.say(message)?;

    if !created.is_success() {
        return Ok(());
    }

    match board.notice() {
        Some(notice) if notice.is_error() => ctx.say(format!(
            "Could not reload the list: {}",
            notice.text()
        )),
        _ => print_facts(ctx, &board),
    }
}
