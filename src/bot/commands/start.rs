use crate::bot::render::{self, KeyDelivery};
use crate::bot::{display_name, Context};
use crate::error::AppError;
use crate::service::EnsuredWallet;
use crate::store::UserId;
use poise::serenity_prelude as serenity;
use tracing::{error, info, warn};

/// The secret-key message, present only for the call that created the wallet.
pub(crate) fn secret_to_disclose(wallet: &EnsuredWallet) -> Option<String> {
    wallet
        .created
        .then(|| render::secret_key_message(&wallet.record.secret_key))
}

/// Create your Solana wallet
#[poise::command(slash_command)]
pub async fn start(ctx: Context<'_>) -> Result<(), AppError> {
    // Every reply here stays private, including the key fallback
    ctx.defer_ephemeral().await?;

    let author = ctx.author();
    let user_id = UserId::from(author.id.get());
    let name = display_name(author);

    let wallet = ctx.data().service.ensure_wallet(&user_id, &name).await?;

    let Some(secret) = secret_to_disclose(&wallet) else {
        ctx.send(render::welcome_back(&name).into_reply()).await?;
        return Ok(());
    };

    // The DM does not depend on the interaction token, so it goes first
    let dm = serenity::CreateMessage::new().content(&secret);
    let delivery = match author.direct_message(&ctx.serenity_context().http, dm).await {
        Ok(_) => {
            info!(user_id = %user_id, "Sent private key by DM");
            KeyDelivery::DirectMessage
        }
        Err(e) => {
            warn!(user_id = %user_id, "Could not DM private key ({}), falling back to ephemeral reply", e);
            KeyDelivery::Ephemeral
        }
    };

    let welcome = render::welcome_new(&name, &wallet.record.address, delivery).into_reply();
    if let Err(e) = ctx.send(welcome).await {
        warn!(user_id = %user_id, "Failed to send welcome: {}", e);
    }

    if delivery == KeyDelivery::Ephemeral {
        let reply = poise::CreateReply::default().content(secret).ephemeral(true);
        if let Err(e) = ctx.send(reply).await {
            error!(user_id = %user_id, "Private key could not be delivered: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UserRecord;
    use crate::wallet::KeyGenerator;

    fn ensured(created: bool) -> EnsuredWallet {
        EnsuredWallet {
            record: UserRecord::new("alice", KeyGenerator::generate()),
            created,
        }
    }

    #[test]
    fn test_secret_disclosed_on_creation() {
        let wallet = ensured(true);
        let secret = secret_to_disclose(&wallet).unwrap();
        assert!(secret.contains(&wallet.record.secret_key));
    }

    #[test]
    fn test_secret_never_disclosed_again() {
        assert!(secret_to_disclose(&ensured(false)).is_none());
    }
}
