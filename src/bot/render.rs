//! Embeds and button rows for every screen the bot shows.

use crate::access::{AccessPolicy, Feature, FeatureSet};
use crate::service::AccessReport;
use poise::serenity_prelude::{
    self as serenity, ButtonStyle, CreateActionRow, CreateButton, CreateEmbed,
};

const COLOR: u32 = 0x9945FF; // Solana purple

/// An embed plus its buttons, sendable as a command reply or an interaction follow-up.
#[derive(Debug, Clone)]
pub struct Screen {
    pub embed: CreateEmbed,
    pub buttons: Vec<CreateButton>,
}

impl Screen {
    fn new(embed: CreateEmbed) -> Self {
        Self {
            embed: embed.color(COLOR),
            buttons: Vec::new(),
        }
    }

    fn button(mut self, button: CreateButton) -> Self {
        self.buttons.push(button);
        self
    }

    /// Discord allows at most five buttons per row
    fn rows(&self) -> Vec<CreateActionRow> {
        self.buttons
            .chunks(5)
            .map(|chunk| CreateActionRow::Buttons(chunk.to_vec()))
            .collect()
    }

    pub fn into_reply(self) -> poise::CreateReply {
        let rows = self.rows();
        poise::CreateReply::default().embed(self.embed).components(rows)
    }

    pub fn into_followup(self) -> serenity::CreateInteractionResponseFollowup {
        let rows = self.rows();
        serenity::CreateInteractionResponseFollowup::new()
            .embed(self.embed)
            .components(rows)
    }
}

fn feature_button(feature: Feature) -> CreateButton {
    let style = match feature {
        Feature::Deposit | Feature::Wallet => ButtonStyle::Primary,
        _ => ButtonStyle::Secondary,
    };
    CreateButton::new(feature.id()).label(feature.label()).style(style)
}

fn labelled(feature: Feature, label: &str) -> CreateButton {
    feature_button(feature).label(label)
}

/// Where a freshly created secret key was delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDelivery {
    DirectMessage,
    /// DMs were refused; the key follows as a reply only the user can see
    Ephemeral,
}

pub fn welcome_new(name: &str, address: &str, delivery: KeyDelivery) -> Screen {
    let key_note = match delivery {
        KeyDelivery::DirectMessage => "(sent in DM, NEVER SHARE IT!)",
        KeyDelivery::Ephemeral => "(shown below, visible only to you. NEVER SHARE IT!)",
    };

    Screen::new(
        CreateEmbed::new()
            .title(format!("🎉 Welcome, {}!", name))
            .description("Your Solana wallet has been created.")
            .field("🔹 Solana Address", format!("`{}`", address), false)
            .field("🔒 Private Key", key_note, false),
    )
    .button(labelled(Feature::Wallet, "Check Wallet"))
}

pub fn welcome_back(name: &str) -> Screen {
    Screen::new(
        CreateEmbed::new()
            .title(format!("👋 Welcome back, {}!", name))
            .description("Your wallet is ready.\nUse the buttons below."),
    )
    .button(labelled(Feature::Wallet, "Check Wallet"))
}

/// The one message that ever carries a user's secret key.
pub fn secret_key_message(secret_key: &str) -> String {
    format!(
        "🔑 **Your private key:** `{}`\n(Keep it safe! This is the only time it will be shown.)",
        secret_key
    )
}

pub fn wallet(report: &AccessReport, policy: &AccessPolicy) -> Screen {
    let status = if report.unlocked {
        "🎉 You have full access!".to_string()
    } else {
        format!(
            "⚠️ Fund your wallet with at least {} SOL to unlock features!",
            policy.min_balance()
        )
    };

    let screen = Screen::new(
        CreateEmbed::new()
            .title("🏦 Your Wallet")
            .field("🔹 Address", format!("`{}`", report.address), false)
            .field("💰 Balance", format!("{:.4} SOL", report.balance), false)
            .description(status),
    );

    feature_buttons(&report.features)
        .into_iter()
        .fold(screen, Screen::button)
}

pub fn deposit(address: &str, policy: &AccessPolicy) -> Screen {
    Screen::new(
        CreateEmbed::new().title("💸 Deposit").description(format!(
            "🔹 Send at least **{} SOL** to this address to unlock features:\n\n`{}`\n\n\
            🚀 After deposit, click the button below to refresh.",
            policy.min_balance(),
            address
        )),
    )
    .button(labelled(Feature::Wallet, "Check Balance"))
}

pub fn feature_result(feature: Feature, allowed: bool, policy: &AccessPolicy) -> String {
    if allowed {
        format!("🚀 {} is coming soon!", feature.label())
    } else {
        format!(
            "❌ You need to deposit at least **{} SOL** to unlock {}!",
            policy.min_balance(),
            feature.label()
        )
    }
}

pub fn help() -> CreateEmbed {
    CreateEmbed::new()
        .title("Vortex Pump Bot Commands")
        .description(
            "🚀 `/start` - Create a Solana wallet\n\
            🏦 `/wallet` - Check your wallet balance\n\
            💸 `/deposit` - Show your deposit address\n\
            🎁 `/refer` - Get your referral link\n\
            🔥 `/shill` - Activate Shill Mode\n\
            💎 `/raid` - Activate Raider Mode\n\
            📊 `/token` - Token-related info\n\
            ❓ `/help` - Show this message",
        )
        .color(COLOR)
}

fn feature_buttons(features: &FeatureSet) -> Vec<CreateButton> {
    features.iter().copied().map(feature_button).collect()
}
