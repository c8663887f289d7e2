//! Telegram adapter: outbound alert sink plus the inbound command listener.
//!
//! Requires the `telegram` feature to be enabled.

mod commands;
mod sink;
mod worker;

pub use commands::{
    alerts_reply, bot_commands, chat_allowed, command_help, error_reply, parse_command,
    probe_report, CommandParseError, WatchCommand,
};
pub use sink::TelegramSink;
pub use worker::command_worker;
