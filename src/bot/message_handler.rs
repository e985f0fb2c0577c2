//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, error, info};

// Import localization
use crate::localization::{t_args_lang, t_lang};

use crate::errors::TrainerError;
use crate::trainer::{translatable_text, Trainer};

// Import UI builder functions
use super::ui_builder::{create_quiz_keyboard, create_translation_keyboard, format_translation_message};

/// Language code of the message's sender
pub fn user_language(msg: &Message) -> Option<&str> {
    msg.from
        .as_ref()
        .and_then(|user| user.language_code.as_deref())
}

/// Localized notice for a trainer error
pub fn error_notice(err: &TrainerError, language_code: Option<&str>) -> String {
    match err {
        TrainerError::Gateway(_) => t_lang("error-translation-failed", language_code),
        TrainerError::StaleRequest(_) => t_lang("request-expired", language_code),
        TrainerError::EmptyVocabulary => t_lang("no-words-to-learn", language_code),
        TrainerError::NoCandidates(term) => {
            t_args_lang("no-translations-found", &[("term", term.as_str())], language_code)
        }
        TrainerError::Storage(_) => t_lang("error-processing-failed", language_code),
    }
}

/// Tell the user what went wrong
pub async fn send_error_notice(
    bot: &Bot,
    chat_id: ChatId,
    err: &TrainerError,
    language_code: Option<&str>,
) -> Result<()> {
    match err {
        TrainerError::EmptyVocabulary => {
            debug!(user_id = %chat_id, "Quiz requested with empty vocabulary")
        }
        TrainerError::StaleRequest(signal) => {
            info!(user_id = %chat_id, signal = %signal, "Stale callback pressed")
        }
        TrainerError::Storage(_) => {
            error!(user_id = %chat_id, error = %err, "Session store failure")
        }
        _ => error!(user_id = %chat_id, error = %err, "Request failed"),
    }

    bot.send_message(chat_id, error_notice(err, language_code))
        .await?;
    Ok(())
}

/// Render the next quiz question, or the empty-vocabulary notice
pub async fn send_quiz_question(
    bot: &Bot,
    chat_id: ChatId,
    trainer: &Trainer,
    language_code: Option<&str>,
) -> Result<()> {
    match trainer.next_question(chat_id.0).await {
        Ok(prompt) => {
            let keyboard = create_quiz_keyboard(&prompt);
            bot.send_message(chat_id, prompt.question)
                .reply_markup(keyboard)
                .await?;
        }
        Err(e) => send_error_notice(bot, chat_id, &e, language_code).await?,
    }
    Ok(())
}

async fn handle_text_message(bot: &Bot, msg: &Message, trainer: &Trainer, text: &str) -> Result<()> {
    let Some(term) = translatable_text(text) else {
        debug!(user_id = %msg.chat.id, "Ignoring empty or command text");
        return Ok(());
    };
    let language_code = user_language(msg);

    debug!(user_id = %msg.chat.id, message_length = term.len(), "Received text message from user");

    match trainer.translate_term(msg.chat.id.0, term).await {
        Ok(prompt) => {
            let keyboard = create_translation_keyboard(&prompt.options);
            bot.send_message(msg.chat.id, format_translation_message(&prompt))
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
            info!(user_id = %msg.chat.id, request_id = %prompt.request_id, "Translation options sent");
        }
        Err(e) => send_error_notice(bot, msg.chat.id, &e, language_code).await?,
    }

    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, trainer: Arc<Trainer>) -> Result<()> {
    if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, &trainer, text).await?;
    } else {
        debug!(user_id = %msg.chat.id, "Ignoring non-text message");
    }

    Ok(())
}
