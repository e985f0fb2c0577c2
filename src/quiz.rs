//! # Quiz Engine Module
//!
//! Builds multiple-choice questions from a chat's saved vocabulary. The prompt shows the
//! translation; the buttons show source terms, one of which belongs to the question.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::{TrainerError, TrainerResult};
use crate::session::VocabularyEntry;

/// Callback data carried by the correct button
pub const CORRECT_ANSWER: &str = "true";
/// Callback data carried by every wrong button
pub const WRONG_ANSWER: &str = "false";

/// Which marker a quiz button carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAnswer {
    Correct,
    Wrong,
}

impl QuizAnswer {
    /// Callback data for this answer
    pub fn signal(self) -> &'static str {
        match self {
            QuizAnswer::Correct => CORRECT_ANSWER,
            QuizAnswer::Wrong => WRONG_ANSWER,
        }
    }

    /// Parse callback data; `None` when it is not a quiz marker
    pub fn from_signal(data: &str) -> Option<Self> {
        match data {
            CORRECT_ANSWER => Some(QuizAnswer::Correct),
            WRONG_ANSWER => Some(QuizAnswer::Wrong),
            _ => None,
        }
    }
}

/// One answer button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizButton {
    pub label: String,
    pub answer: QuizAnswer,
}

/// A rendered question: prompt text plus buttons in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPrompt {
    pub question: String,
    pub buttons: Vec<QuizButton>,
}

impl QuizPrompt {
    /// Label of the button carrying the correct marker
    pub fn correct_label(&self) -> Option<&str> {
        self.buttons
            .iter()
            .find(|button| button.answer == QuizAnswer::Correct)
            .map(|button| button.label.as_str())
    }
}

/// Pick a question and up to `distractors` wrong answers from `words`.
///
/// Distractors are a random sample of distinct positions in the vocabulary. Any whose
/// translation matches the question's is dropped, so a prompt may end up with fewer wrong
/// buttons than requested, or none at all.
pub fn build_quiz<R: Rng + ?Sized>(
    words: &[VocabularyEntry],
    distractors: usize,
    rng: &mut R,
) -> TrainerResult<QuizPrompt> {
    let sample = words.choose(rng).ok_or(TrainerError::EmptyVocabulary)?;

    let wrong: Vec<&VocabularyEntry> = words
        .choose_multiple(rng, distractors)
        .filter(|entry| entry.to != sample.to)
        .take(distractors)
        .collect();

    let mut buttons: Vec<QuizButton> = wrong
        .into_iter()
        .map(|entry| QuizButton {
            label: entry.from.clone(),
            answer: QuizAnswer::Wrong,
        })
        .collect();
    buttons.push(QuizButton {
        label: sample.from.clone(),
        answer: QuizAnswer::Correct,
    });
    buttons.shuffle(rng);

    Ok(QuizPrompt {
        question: sample.to.clone(),
        buttons,
    })
}
