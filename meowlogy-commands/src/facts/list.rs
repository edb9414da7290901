use meowlogy_api::FactBoard;
use meowlogy_core::{Context, Error};
use meowlogy_utils::formatting::fact_line;

use crate::api_failure;

pub const EMPTY_MESSAGE: &str = "No cat facts yet. Add one with `meowlogy facts add <fact>`.";

pub async fn list(ctx: &Context<'_>) -> Result<(), Error> {
    ctx.require_session()?;

    let mut board = FactBoard::new(ctx.data.api.clone());
    board.refresh().await.map_err(api_failure)?;
    print_facts(ctx, &board)
}

pub(crate) fn print_facts(ctx: &Context<'_>, board: &FactBoard) -> Result<(), Error> {
    if board.facts().is_empty() {
        return ctx.say(EMPTY_MESSAGE);
    }

    for (index, fact) in board.facts().iter().enumerate() {
        ctx.say(fact_line(
            index + 1,
            &fact.fact,
            fact.id.as_deref(),
            fact.likes_count,
        ))?;
    }
    Ok(())
}
