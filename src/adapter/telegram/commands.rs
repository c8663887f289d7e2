//! Telegram command parsing and reply composition.
//!
//! Everything here is pure so the command surface can be tested without a
//! bot token or a network.

use crate::error::Error;
use crate::port::ApiProbe;

/// Supported Telegram commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchCommand {
    Start,
    Help,
    Check,
    Orders,
    Debug,
}

/// Parse error for Telegram command messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a Telegram message into a bot command. `/command@botname` mentions
/// are accepted; surrounding whitespace is ignored.
pub fn parse_command(text: &str) -> Result<WatchCommand, CommandParseError> {
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

    match command {
        "/start" => Ok(WatchCommand::Start),
        "/help" => Ok(WatchCommand::Help),
        "/check" => Ok(WatchCommand::Check),
        "/orders" => Ok(WatchCommand::Orders),
        "/debug" => Ok(WatchCommand::Debug),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// True when `chat_id` may control the watcher. An empty allowlist means
/// anyone who can talk to the bot may.
#[must_use]
pub fn chat_allowed(chat_id: i64, allowed_chats: &[i64]) -> bool {
    allowed_chats.is_empty() || allowed_chats.contains(&chat_id)
}

/// Help text returned by `/help` and after an unknown command.
#[must_use]
pub const fn command_help() -> &'static str {
    "📋 Commands\n\n\
    /start - 🔔 Watch this chat: periodic message and order checks\n\
    /check - 🔎 Check for new messages now\n\
    /orders - 🧾 Check for new orders now\n\
    /debug - 🛠 Seller API diagnostics\n\
    /help - 📋 Show this list"
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("start", "Watch this chat for new messages and orders"),
        ("check", "Check for new messages now"),
        ("orders", "Check for new orders now"),
        ("debug", "Seller API diagnostics"),
        ("help", "Show available commands"),
    ]
}

pub const GREETING: &str =
    "Hi! 👋\nWatching your seller account: new messages and orders will land here.";
pub const CHECKING_MESSAGES: &str = "Checking for new messages...";
pub const CHECKING_ORDERS: &str = "Checking for new orders...";
pub const NO_NEW_MESSAGES: &str = "✅ No new messages.";
pub const NO_NEW_ORDERS: &str = "✅ No new orders.";
pub const NOT_ALLOWED: &str = "⛔ This chat is not allowed to control the watcher.";

/// Alerts joined into one message, or the nothing-new placeholder.
#[must_use]
pub fn alerts_reply(alerts: &[String], nothing_new: &'static str) -> String {
    if alerts.is_empty() {
        nothing_new.to_string()
    } else {
        alerts.join("\n\n")
    }
}

/// Error text sent to the chat that asked for a check.
#[must_use]
pub fn error_reply(err: &Error) -> String {
    format!("⚠️ Error: {err}")
}

/// Per-endpoint diagnostics report for `/debug`.
#[must_use]
pub fn probe_report(seller_id: i64, probe: &ApiProbe) -> String {
    let verdict = if probe.ok() {
        "✅ API access is configured correctly"
    } else {
        "❌ API access is misconfigured"
    };
    format!(
        "SELLER_ID: {seller_id}\n\
         apilogin: {}\n\
         chats: {}\n\
         last_sales: {}\n\
         {verdict}",
        probe.login, probe.chats, probe.sales
    )
}
