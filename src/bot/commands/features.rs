use crate::access::Feature;
use crate::bot::{render, Context};
use crate::error::AppError;
use crate::store::UserId;

async fn run_feature(ctx: Context<'_>, feature: Feature) -> Result<(), AppError> {
    let user_id = UserId::from(ctx.author().id.get());

    let data = ctx.data();
    let allowed = data.service.check_feature(&user_id, feature).await;
    let text = render::feature_result(feature, allowed, data.service.policy());
    ctx.send(poise::CreateReply::default().content(text).ephemeral(!allowed))
        .await?;
    Ok(())
}

/// Activate Raider Mode
#[poise::command(slash_command)]
pub async fn raid(ctx: Context<'_>) -> Result<(), AppError> {
    run_feature(ctx, Feature::Raid).await
}

/// Activate Shill Mode
#[poise::command(slash_command)]
pub async fn shill(ctx: Context<'_>) -> Result<(), AppError> {
    run_feature(ctx, Feature::Shill).await
}

/// Token-related info
#[poise::command(slash_command)]
pub async fn token(ctx: Context<'_>) -> Result<(), AppError> {
    run_feature(ctx, Feature::Token).await
}

/// Get your referral link
#[poise::command(slash_command)]
pub async fn refer(ctx: Context<'_>) -> Result<(), AppError> {
    run_feature(ctx, Feature::Refer).await
}
