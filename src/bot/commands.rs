//! Bot commands and their handler

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::debug;

// Import localization
use crate::localization::t_lang;

use crate::trainer::Trainer;

use super::message_handler::{send_error_notice, send_quiz_question, user_language};
use super::ui_builder::vocabulary_list_messages;

/// Commands registered with Telegram at startup
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "learn one of recently added words")]
    Learn,
    #[command(description = "list recently added words")]
    List,
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "show help")]
    Help,
}

fn help_message(language_code: Option<&str>) -> String {
    [
        t_lang("help-commands", language_code),
        t_lang("help-learn", language_code),
        t_lang("help-list", language_code),
        t_lang("help-help", language_code),
        String::new(),
        t_lang("help-tips", language_code),
    ]
    .join("\n")
}

fn welcome_message(language_code: Option<&str>) -> String {
    format!(
        "👋 {}\n\n{}\n{}\n\n{}",
        t_lang("welcome-title", language_code),
        t_lang("welcome-description", language_code),
        t_lang("welcome-pick", language_code),
        help_message(language_code)
    )
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    trainer: Arc<Trainer>,
) -> Result<()> {
    let language_code = user_language(&msg);
    debug!(user_id = %msg.chat.id, command = ?cmd, "Received command from user");

    match cmd {
        Command::Learn => {
            send_quiz_question(&bot, msg.chat.id, &trainer, language_code).await?;
        }
        Command::List => match trainer.vocabulary(msg.chat.id.0).await {
            Ok(words) => {
                for chunk in vocabulary_list_messages(&words, language_code) {
                    bot.send_message(msg.chat.id, chunk).await?;
                }
            }
            Err(e) => send_error_notice(&bot, msg.chat.id, &e, language_code).await?,
        },
        Command::Start => {
            bot.send_message(msg.chat.id, welcome_message(language_code))
                .await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, help_message(language_code))
                .await?;
        }
    }

    Ok(())
}
