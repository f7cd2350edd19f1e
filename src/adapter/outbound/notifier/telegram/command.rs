//! Telegram command parsing.

/// Supported Telegram commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelegramCommand {
    Help,
    Track { url: String },
    Untrack { url: String },
    List,
    Status { url: String },
}

/// Parse error for Telegram command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
    MissingArgument(&'static str),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
            Self::MissingArgument(name) => write!(f, "missing argument `{name}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a Telegram message into a bot command.
///
/// `/start` with a link tracks it; bare `/start` shows help.
pub fn parse_command(text: &str) -> Result<TelegramCommand, CommandParseError> {
    let mut parts = text.split_whitespace();
    let Some(raw_command) = parts.next() else {
        return Err(CommandParseError::NotACommand);
    };
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);
    let argument = parts.next().map(str::to_string);

    match command {
        "/help" => Ok(TelegramCommand::Help),
        "/start" => Ok(argument.map_or(TelegramCommand::Help, |url| TelegramCommand::Track { url })),
        "/track" => Ok(TelegramCommand::Track {
            url: argument.ok_or(CommandParseError::MissingArgument("url"))?,
        }),
        "/stop" | "/untrack" => Ok(TelegramCommand::Untrack {
            url: argument.ok_or(CommandParseError::MissingArgument("url"))?,
        }),
        "/list" => Ok(TelegramCommand::List),
        "/status" => Ok(TelegramCommand::Status {
            url: argument.ok_or(CommandParseError::MissingArgument("url"))?,
        }),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// Help text returned by `/help` and bare `/start`.
#[must_use]
pub const fn command_help() -> &'static str {
    "📋 Commands\n\n\
    /track <url> - 🔔 Get alerts when a product's stock changes\n\
    /stop <url> - 🛑 Stop tracking a product\n\
    /list - 📦 Products you are tracking\n\
    /status <url> - 🔎 Check a product once without tracking\n\
    /help - ❓ Show all commands\n\n\
    Links must be product pages on the shop, e.g. https://shop.amul.com/en/product/..."
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("track", "Track a product link"),
        ("stop", "Stop tracking a product link"),
        ("list", "Products you are tracking"),
        ("status", "Check a product once"),
        ("help", "Show all commands"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://shop.amul.com/en/product/amul-lassi";

    #[test]
    fn parse_track_and_aliases() {
        let expected = TelegramCommand::Track {
            url: URL.to_string(),
        };
        assert_eq!(parse_command(&format!("/track {URL}")).unwrap(), expected);
        assert_eq!(parse_command(&format!("/start {URL}")).unwrap(), expected);
    }

    #[test]
    fn bare_start_is_help() {
        assert_eq!(parse_command("/start").unwrap(), TelegramCommand::Help);
        assert_eq!(parse_command("/help").unwrap(), TelegramCommand::Help);
    }

    #[test]
    fn parse_stop_and_untrack() {
        let expected = TelegramCommand::Untrack {
            url: URL.to_string(),
        };
        assert_eq!(parse_command(&format!("/stop {URL}")).unwrap(), expected);
        assert_eq!(parse_command(&format!("/untrack {URL}")).unwrap(), expected);
    }

    #[test]
    fn parse_list_and_status() {
        assert_eq!(parse_command("/list").unwrap(), TelegramCommand::List);
        assert_eq!(
            parse_command(&format!("/status  {URL} ")).unwrap(),
            TelegramCommand::Status {
                url: URL.to_string()
            }
        );
    }

    #[test]
    fn parse_command_with_bot_mention() {
        assert_eq!(
            parse_command("/list@amul_stock_bot").unwrap(),
            TelegramCommand::List
        );
    }

    #[test]
    fn url_commands_require_argument() {
        for text in ["/track", "/stop", "/untrack", "/status"] {
            assert_eq!(
                parse_command(text),
                Err(CommandParseError::MissingArgument("url"))
            );
        }
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("hello"), Err(CommandParseError::NotACommand));
        assert_eq!(parse_command("   "), Err(CommandParseError::NotACommand));
    }

    #[test]
    fn unknown_command_is_reported() {
        assert_eq!(
            parse_command("/pause"),
            Err(CommandParseError::UnknownCommand("/pause".to_string()))
        );
    }

    #[test]
    fn bot_commands_have_descriptions() {
        for (command, description) in bot_commands() {
            assert!(!command.starts_with('/'));
            assert!(!description.is_empty());
        }
    }
}
