//! Telegram notification and command handling.
//!
//! Provides the [`TelegramNotifier`] for stock alerts and the command
//! listener that serves `/track`, `/stop`, `/list` and `/status`.
//!
//! Requires the `telegram` feature to be enabled.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, ParseMode, Recipient};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::UserId;
use crate::port::{DeliveryOutcome, Notifier, StatusChange};

use super::command::bot_commands;
use super::control::TelegramControl;
use super::format::{escape_markdown, format_change_message};

/// Where alerts are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Straight to each subscriber's own chat.
    Direct,
    /// To one shared channel, mentioning each subscriber.
    Channel { channel_id: i64 },
}

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    pub delivery: Delivery,
}

/// Telegram notifier that sends one message per subscriber.
pub struct TelegramNotifier {
    bot: Bot,
    delivery: Delivery,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            bot: Bot::new(&config.bot_token),
            delivery: config.delivery,
        }
    }

    async fn send(&self, recipient: &UserId, text: &str) -> Result<(), String> {
        let chat_id = recipient
            .as_str()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| format!("not a Telegram chat id: {recipient}"))?;

        let (target, text) = match self.delivery {
            Delivery::Direct => (Recipient::Id(chat_id), text.to_string()),
            Delivery::Channel { channel_id } => (
                Recipient::Id(ChatId(channel_id)),
                format!(
                    "[{}](tg://user?id={})\n{text}",
                    escape_markdown("🔔 Alert"),
                    chat_id.0
                ),
            ),
        };

        self.bot
            .send_message(target, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, recipients: &[UserId], change: &StatusChange) -> Vec<DeliveryOutcome> {
        let text = format_change_message(change);
        let mut outcomes = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            match self.send(recipient, &text).await {
                Ok(()) => {
                    debug!(recipient = %recipient, url = %change.product.url, "Notified subscriber");
                    outcomes.push(DeliveryOutcome::delivered(recipient.clone()));
                }
                Err(e) => {
                    error!(recipient = %recipient, error = %e, "Failed to send Telegram alert");
                    outcomes.push(DeliveryOutcome::failed(recipient.clone(), e));
                }
            }
        }

        outcomes
    }
}

/// Spawn the background worker that answers chat commands.
pub fn spawn_command_worker(config: &TelegramConfig, control: TelegramControl) -> JoinHandle<()> {
    let bot = Bot::new(&config.bot_token);
    tokio::spawn(telegram_command_worker(bot, control))
}

async fn telegram_command_worker(bot: Bot, control: TelegramControl) {
    // Register commands with Telegram so they appear in the "/" menu
    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!("Telegram command listener started");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let control = control.clone();
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };

            let user = UserId::from(msg.chat.id.0);
            if let Some(response) = control.respond(&user, text).await {
                if let Err(e) = bot
                    .send_message(msg.chat.id, response)
                    .parse_mode(ParseMode::MarkdownV2)
                    .await
                {
                    error!(error = %e, "Failed to send Telegram command response");
                }
            }

            respond(())
        }
    })
    .await;
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
