use meowlogy_api::FactBoard;
use meowlogy_core::{Context, Error};

use crate::api_failure;

pub async fn random(ctx: &Context<'_>) -> Result<(), Error> {
    ctx.require_session()?;

    let mut board = FactBoard::new(ctx.data.api.clone());
    let fact = board.pick_random().await.map_err(api_failure)?;
    ctx.say(format!("\u{1f431} {}", fact.fact))
}
