//! # Callback Resolver Module
//!
//! A button press arrives with nothing but its callback data and the message it was
//! attached to. The resolver decides which of the two flows the press belongs to:
//!
//! - **Quiz verdict**: the data is one of the quiz markers. The verdict is rendered from the
//!   original prompt, and the next question is requested as a follow-up.
//! - **Translation confirmation**: the data is a `"<id>:<index>"` key. The option is looked
//!   up in the request tracker and committed to the vocabulary.

use crate::errors::{TrainerError, TrainerResult};
use crate::quiz::{QuizAnswer, CORRECT_ANSWER};
use crate::session::{request_id_of, Session, VocabularyEntry};

pub const SUCCESS_GLYPH: &str = "👍";
pub const FAILURE_GLYPH: &str = "👎";
pub const PAIR_SEPARATOR: &str = "↔";

/// What a callback's data asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackSignal {
    QuizAnswer(QuizAnswer),
    ConfirmVariant { request_id: String, key: String },
}

impl CallbackSignal {
    pub fn parse(data: &str) -> TrainerResult<Self> {
        if let Some(answer) = QuizAnswer::from_signal(data) {
            return Ok(CallbackSignal::QuizAnswer(answer));
        }

        match request_id_of(data) {
            Some(id) => Ok(CallbackSignal::ConfirmVariant {
                request_id: id.to_string(),
                key: data.to_string(),
            }),
            None => Err(TrainerError::StaleRequest(data.to_string())),
        }
    }
}

/// What should happen after the original message has been edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    /// Render the next quiz question
    NextQuestion,
    None,
}

/// Outcome of a resolved button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Replacement text for the message the button was attached to
    pub edited_text: String,
    /// Entry committed to the vocabulary, if any
    pub added: Option<VocabularyEntry>,
    pub follow_up: FollowUp,
}

/// Format a vocabulary pair for display
pub fn format_pair(from: &str, to: &str) -> String {
    format!("{from} {PAIR_SEPARATOR} {to}")
}

/// Render the verdict for a quiz answer.
///
/// `buttons` are the `(label, callback data)` pairs of the original prompt; the correct
/// label is read from whichever button carries the correct marker.
pub fn resolve_quiz_answer<'a, I>(
    answer: QuizAnswer,
    prompt_text: &str,
    buttons: I,
) -> TrainerResult<Resolution>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let correct_label = buttons
        .into_iter()
        .find(|(_, data)| *data == CORRECT_ANSWER)
        .map(|(label, _)| label)
        .ok_or_else(|| TrainerError::StaleRequest(answer.signal().to_string()))?;

    let glyph = match answer {
        QuizAnswer::Correct => SUCCESS_GLYPH,
        QuizAnswer::Wrong => FAILURE_GLYPH,
    };

    Ok(Resolution {
        edited_text: format!("{glyph} {}", format_pair(prompt_text, correct_label)),
        added: None,
        follow_up: FollowUp::NextQuestion,
    })
}

/// Commit the option behind `key` to the session's vocabulary
pub fn resolve_confirmation(session: &mut Session, key: &str) -> TrainerResult<Resolution> {
    let entry = session.confirm_variant(key)?;

    Ok(Resolution {
        edited_text: format!("{SUCCESS_GLYPH} {}", format_pair(&entry.from, &entry.to)),
        added: Some(entry),
        follow_up: FollowUp::None,
    })
}
