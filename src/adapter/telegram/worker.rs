//! Inbound command listener.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{BotCommand, ParseMode};
use tracing::{error, info, warn};

use super::commands::{self, CommandParseError, WatchCommand};
use crate::port::WatchControl;

/// Listen for commands until the bot's update stream ends.
///
/// `seller_id` only feeds the `/debug` report; the allowlist is the raw
/// config value (empty means every chat is allowed).
pub async fn command_worker(
    bot: Bot,
    control: Arc<dyn WatchControl>,
    allowed_chats: Vec<i64>,
    seller_id: i64,
) {
    // Register commands with Telegram so they appear in the "/" menu
    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!("Telegram command listener started");

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let control = Arc::clone(&control);
        let allowed_chats = allowed_chats.clone();
        async move {
            let Some(text) = msg.text() else {
                return respond(());
            };
            let chat_id = msg.chat.id.0;

            let command = match commands::parse_command(text) {
                Ok(command) => command,
                Err(CommandParseError::NotACommand) => return respond(()),
                Err(err) => {
                    let reply = format!("Invalid command: {err}\n\n{}", commands::command_help());
                    send_plain(&bot, chat_id, reply).await;
                    return respond(());
                }
            };

            if !commands::chat_allowed(chat_id, &allowed_chats) {
                warn!(chat_id, "Ignoring command from unauthorized chat");
                send_plain(&bot, chat_id, commands::NOT_ALLOWED.to_string()).await;
                return respond(());
            }

            handle_command(&bot, chat_id, command, control.as_ref(), seller_id).await;
            respond(())
        }
    })
    .await;
}

async fn handle_command(
    bot: &Bot,
    chat_id: i64,
    command: WatchCommand,
    control: &dyn WatchControl,
    seller_id: i64,
) {
    match command {
        WatchCommand::Start => {
            send_plain(bot, chat_id, commands::GREETING.to_string()).await;
            control.start_session(chat_id).await;
        }
        WatchCommand::Help => {
            send_plain(bot, chat_id, commands::command_help().to_string()).await;
        }
        WatchCommand::Check => {
            send_plain(bot, chat_id, commands::CHECKING_MESSAGES.to_string()).await;
            match control.check_messages_now(chat_id).await {
                Ok(alerts) => {
                    let reply = commands::alerts_reply(&alerts, commands::NO_NEW_MESSAGES);
                    send_html(bot, chat_id, reply).await;
                }
                Err(err) => send_plain(bot, chat_id, commands::error_reply(&err)).await,
            }
        }
        WatchCommand::Orders => {
            send_plain(bot, chat_id, commands::CHECKING_ORDERS.to_string()).await;
            match control.check_orders_now(chat_id).await {
                Ok(alerts) => {
                    let reply = commands::alerts_reply(&alerts, commands::NO_NEW_ORDERS);
                    send_html(bot, chat_id, reply).await;
                }
                Err(err) => send_plain(bot, chat_id, commands::error_reply(&err)).await,
            }
        }
        WatchCommand::Debug => {
            let probe = control.probe_api().await;
            send_plain(bot, chat_id, commands::probe_report(seller_id, &probe)).await;
        }
    }
}

async fn send_plain(bot: &Bot, chat_id: i64, text: String) {
    if let Err(e) = bot.send_message(ChatId(chat_id), text).await {
        error!(error = %e, chat_id, "Failed to send Telegram reply");
    }
}

async fn send_html(bot: &Bot, chat_id: i64, text: String) {
    if let Err(e) = bot
        .send_message(ChatId(chat_id), text)
        .parse_mode(ParseMode::Html)
        .await
    {
        error!(error = %e, chat_id, "Failed to send Telegram reply");
    }
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = commands::bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
