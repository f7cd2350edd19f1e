//! Telegram bot configuration.

use serde::Deserialize;

/// Where stock alerts go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Each subscriber's own chat.
    #[default]
    Direct,
    /// One shared channel with a mention per subscriber.
    Channel,
}

/// `[telegram]` section. The token comes from `TELEGRAM_BOT_TOKEN` only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramAppConfig {
    /// Run the bot and send alerts through it.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub delivery: DeliveryMode,
    /// Required for `channel` delivery.
    #[serde(default)]
    pub channel_id: Option<i64>,
    /// Bot API token, filled from the environment.
    #[serde(skip)]
    pub bot_token: Option<String>,
}

#[cfg(feature = "telegram")]
impl TelegramAppConfig {
    /// Adapter settings, or `None` when the bot is disabled or has no token.
    #[must_use]
    pub fn adapter_config(&self) -> Option<crate::adapter::outbound::notifier::telegram::TelegramConfig> {
        use crate::adapter::outbound::notifier::telegram::{Delivery, TelegramConfig};

        if !self.enabled {
            return None;
        }
        let delivery = match (self.delivery, self.channel_id) {
            (DeliveryMode::Channel, Some(channel_id)) => Delivery::Channel { channel_id },
            (DeliveryMode::Channel, None) => return None,
            (DeliveryMode::Direct, _) => Delivery::Direct,
        };
        Some(TelegramConfig {
            bot_token: self.bot_token.clone()?,
            delivery,
        })
    }
}
