use crate::bot::{render, Context};
use crate::error::AppError;
use crate::store::UserId;

/// Check your wallet balance and unlocked features
#[poise::command(slash_command)]
pub async fn wallet(ctx: Context<'_>) -> Result<(), AppError> {
    let user_id = UserId::from(ctx.author().id.get());

    // the node lookup can exceed the interaction deadline
    ctx.defer().await?;

    let data = ctx.data();
    let report = data.service.refresh_access(&user_id).await?;
    ctx.send(render::wallet(&report, data.service.policy()).into_reply())
        .await?;
    Ok(())
}

/// Show the address to fund your wallet
#[poise::command(slash_command)]
pub async fn deposit(ctx: Context<'_>) -> Result<(), AppError> {
    let user_id = UserId::from(ctx.author().id.get());

    let data = ctx.data();
    let address = data.service.deposit_address(&user_id).await?;
    ctx.send(render::deposit(&address, data.service.policy()).into_reply())
        .await?;
    Ok(())
}
