use crate::access::Feature;
use crate::bot::{render, Data};
use crate::error::AppError;
use crate::store::UserId;
use poise::serenity_prelude::{self as serenity, ComponentInteraction, Context};
use tracing::{debug, error, warn};

/// Handle a button press. Errors are answered in an ephemeral follow-up.
pub async fn handle_component(ctx: &Context, component: &ComponentInteraction, data: &Data) {
    let Some(feature) = Feature::from_id(&component.data.custom_id) else {
        debug!("Ignoring unknown component id {}", component.data.custom_id);
        return;
    };

    // acknowledge now, the reply comes as a follow-up
    if let Err(e) = component.defer(&ctx.http).await {
        error!("Failed to acknowledge component interaction: {}", e);
        return;
    }

    let user_id = UserId::from(component.user.id.get());
    let result = match feature {
        Feature::Wallet => refresh_wallet(data, &user_id).await,
        Feature::Deposit => show_deposit(data, &user_id).await,
        gated => Ok(check_feature(data, &user_id, gated).await),
    };

    let followup = match result {
        Ok(followup) => followup,
        Err(e) => {
            log_event_error(&e);
            serenity::CreateInteractionResponseFollowup::new()
                .content(e.user_message())
                .ephemeral(true)
        }
    };

    if let Err(e) = component.create_followup(&ctx.http, followup).await {
        error!("Failed to send component reply: {}", e);
    }
}

async fn refresh_wallet(
    data: &Data,
    user_id: &UserId,
) -> Result<serenity::CreateInteractionResponseFollowup, AppError> {
    let report = data.service.refresh_access(user_id).await?;
    Ok(render::wallet(&report, data.service.policy()).into_followup())
}

async fn show_deposit(
    data: &Data,
    user_id: &UserId,
) -> Result<serenity::CreateInteractionResponseFollowup, AppError> {
    let address = data.service.deposit_address(user_id).await?;
    Ok(render::deposit(&address, data.service.policy()).into_followup())
}

async fn check_feature(
    data: &Data,
    user_id: &UserId,
    feature: Feature,
) -> serenity::CreateInteractionResponseFollowup {
    let allowed = data.service.check_feature(user_id, feature).await;
    serenity::CreateInteractionResponseFollowup::new()
        .content(render::feature_result(feature, allowed, data.service.policy()))
        .ephemeral(!allowed)
}

/// Per-event errors are logged and answered; they never stop the bot.
pub fn log_event_error(error: &AppError) {
    match error {
        AppError::NotFound(user_id) => debug!("No wallet for user {}", user_id),
        AppError::OracleUnavailable(reason) => warn!("Balance oracle unavailable: {}", reason),
        other => error!("Event failed: {}", other),
    }
}
