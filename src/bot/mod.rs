pub mod commands;
pub mod handler;
pub mod render;

use crate::error::AppError;
use crate::service::WalletService;
use poise::serenity_prelude::{self as serenity, FullEvent, GatewayIntents, Interaction};
use tracing::{error, info};

/// Shared data accessible in all commands
#[derive(Debug)]
pub struct Data {
    pub service: WalletService,
}

pub type Context<'a> = poise::Context<'a, Data, AppError>;

/// Name shown in replies: the username, as the transport reports it.
pub fn display_name(user: &serenity::User) -> String {
    user.name.clone()
}

/// Event handler for Discord events
async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Data, AppError>,
    data: &Data,
) -> Result<(), AppError> {
    match event {
        FullEvent::Ready { data_about_bot } => {
            info!("Bot is ready! Logged in as {}", data_about_bot.user.name);
        }
        FullEvent::InteractionCreate {
            interaction: Interaction::Component(component),
        } => {
            handler::handle_component(ctx, component, data).await;
        }
        _ => {}
    }
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, AppError>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            handler::log_event_error(&error);
            let reply = poise::CreateReply::default()
                .content(error.user_message())
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error reply: {}", e);
            }
        }
        poise::FrameworkError::Setup { error, .. } => {
            error!("Setup error: {}", error);
        }
        err => {
            if let Err(e) = poise::builtins::on_error(err).await {
                error!("Framework error: {}", e);
            }
        }
    }
}

/// Create and configure the Discord bot framework
pub fn create_framework(
    service: WalletService,
    guild_id: Option<u64>,
) -> poise::Framework<Data, AppError> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all_commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                let commands = &framework.options().commands;
                match guild_id {
                    Some(id) => {
                        poise::builtins::register_in_guild(ctx, commands, serenity::GuildId::new(id))
                            .await?;
                        info!("Registered {} slash commands in guild {}", commands.len(), id);
                    }
                    None => {
                        poise::builtins::register_globally(ctx, commands).await?;
                        info!("Registered {} slash commands globally", commands.len());
                    }
                }
                Ok(Data { service })
            })
        })
        .build()
}

/// Connect to Discord and run until the gateway shuts down.
pub async fn start_bot_with_token(
    service: WalletService,
    guild_id: Option<u64>,
    token: &str,
) -> Result<(), AppError> {
    if token.is_empty() {
        return Err(AppError::ConfigMissing("bot.token"));
    }

    // slash commands and buttons need no privileged intents
    let intents = GatewayIntents::non_privileged();
    let framework = create_framework(service, guild_id);

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting Discord bot...");
    client.start().await?;

    Ok(())
}
