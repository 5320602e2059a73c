use crate::bot::{render, Context};
use crate::error::AppError;

/// List the bot's commands
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), AppError> {
    ctx.send(poise::CreateReply::default().embed(render::help()).ephemeral(true))
        .await?;
    Ok(())
}
