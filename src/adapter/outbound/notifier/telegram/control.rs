//! Telegram command execution against the tracking service.

use tracing::{error, warn};

use crate::application::{TrackOutcome, TrackingService, UntrackOutcome};
use crate::domain::UserId;
use crate::error::Error;

use super::command::{command_help, parse_command, CommandParseError, TelegramCommand};
use super::format::{
    escape_markdown, format_observation, format_product_card, format_product_list,
};

/// Runs bot commands on behalf of the chat that sent them.
#[derive(Clone)]
pub struct TelegramControl {
    tracking: TrackingService,
}

impl TelegramControl {
    #[must_use]
    pub fn new(tracking: TrackingService) -> Self {
        Self { tracking }
    }

    /// Reply (as `MarkdownV2`) to a chat message, or `None` for plain text.
    pub async fn respond(&self, user: &UserId, text: &str) -> Option<String> {
        match parse_command(text) {
            Ok(command) => Some(self.execute(user, command).await),
            Err(CommandParseError::NotACommand) => None,
            Err(err) => Some(escape_markdown(&format!(
                "Invalid command: {err}\n\n{}",
                command_help()
            ))),
        }
    }

    /// Execute one parsed command and return response text.
    pub async fn execute(&self, user: &UserId, command: TelegramCommand) -> String {
        match command {
            TelegramCommand::Help => escape_markdown(command_help()),
            TelegramCommand::Track { url } => self.track(user, &url).await,
            TelegramCommand::Untrack { url } => self.untrack(user, &url).await,
            TelegramCommand::List => self.list(user).await,
            TelegramCommand::Status { url } => self.status(&url).await,
        }
    }

    async fn track(&self, user: &UserId, url: &str) -> String {
        match self.tracking.track(user, url).await {
            Ok(TrackOutcome::Tracking(product)) => {
                format_product_card("✅ *Now Tracking*", &product)
            }
            Ok(TrackOutcome::AlreadyTracking(_)) => {
                escape_markdown("ℹ️ You are already tracking this product.")
            }
            Err(e) => self.failure(user, "track", &e),
        }
    }

    async fn untrack(&self, user: &UserId, url: &str) -> String {
        match self.tracking.untrack(user, url).await {
            Ok(UntrackOutcome::Stopped { name, .. }) => {
                format!("🛑 Stopped tracking *{}*", escape_markdown(&name))
            }
            Ok(UntrackOutcome::NotTracking) => {
                escape_markdown("ℹ️ You are not tracking this product.")
            }
            Err(e) => self.failure(user, "stop", &e),
        }
    }

    async fn list(&self, user: &UserId) -> String {
        match self.tracking.list(user).await {
            Ok(products) => format_product_list(&products),
            Err(e) => self.failure(user, "list", &e),
        }
    }

    async fn status(&self, url: &str) -> String {
        match self.tracking.status(url).await {
            Ok((url, observation)) => format_observation(&url, &observation),
            Err(e) => escape_markdown(&user_message(&e, self.tracking.rules().allowed_host())),
        }
    }

    fn failure(&self, user: &UserId, command: &'static str, err: &Error) -> String {
        match err {
            Error::Domain(_) | Error::Source(_) => {
                warn!(user = %user, command, error = %err, "Command rejected");
            }
            _ => error!(user = %user, command, error = %err, "Command failed"),
        }
        escape_markdown(&user_message(err, self.tracking.rules().allowed_host()))
    }
}

/// What the user sees for a failed command.
fn user_message(err: &Error, host: &str) -> String {
    match err {
        Error::Domain(e) => format!("❌ {e}\n\nSend a product link from {host}."),
        Error::Source(e) => format!("❌ Could not check that product: {e}"),
        _ => "⚠️ Something went wrong. Please try again later.".to_string(),
    }
}
