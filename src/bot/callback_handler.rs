//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::errors::{TrainerError, TrainerResult};
use crate::resolver::{FollowUp, Resolution};
use crate::trainer::Trainer;

use super::message_handler::{send_error_notice, send_quiz_question};
use super::ui_builder::keyboard_buttons;

/// One step of the reply to a button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackReply {
    /// Replace the pressed message's text and drop its keyboard
    EditPrompt(String),
    /// Clear the client's loading state
    AnswerQuery,
    NextQuestion,
    Notice(TrainerError),
}

/// Replies for a resolved press, in the order they are sent.
///
/// The query is answered before anything new is sent, so a failed send never leaves the
/// button spinning.
pub fn callback_replies(outcome: TrainerResult<Resolution>) -> Vec<CallbackReply> {
    match outcome {
        Ok(resolution) => {
            let mut replies = vec![
                CallbackReply::EditPrompt(resolution.edited_text),
                CallbackReply::AnswerQuery,
            ];
            if resolution.follow_up == FollowUp::NextQuestion {
                replies.push(CallbackReply::NextQuestion);
            }
            replies
        }
        Err(e) => vec![CallbackReply::AnswerQuery, CallbackReply::Notice(e)],
    }
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    trainer: Arc<Trainer>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let data = q.data.as_deref().unwrap_or("");
    let language_code = q.from.language_code.as_deref();

    let Some(msg) = &q.message else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };
    let chat_id = msg.chat().id;

    // The quiz branch needs the prompt and its buttons back
    let (prompt_text, buttons) = match q.regular_message() {
        Some(message) => (
            message.text(),
            message.reply_markup().map(keyboard_buttons).unwrap_or_default(),
        ),
        None => (None, Vec::new()),
    };

    let outcome = trainer
        .resolve_callback(chat_id.0, data, prompt_text, &buttons)
        .await;

    for reply in callback_replies(outcome) {
        match reply {
            CallbackReply::EditPrompt(text) => {
                // Editing without a markup also removes the keyboard
                if let Err(e) = bot.edit_message_text(chat_id, msg.id(), text).await {
                    error!(user_id = %q.from.id, error = %e, "Failed to edit message after callback");
                }
            }
            CallbackReply::AnswerQuery => {
                if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                    error!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
                }
            }
            CallbackReply::NextQuestion => {
                send_quiz_question(&bot, chat_id, &trainer, language_code).await?
            }
            CallbackReply::Notice(e) => send_error_notice(&bot, chat_id, &e, language_code).await?,
        }
    }

    Ok(())
}
