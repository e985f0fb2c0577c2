//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup};
use teloxide::utils::html;

// Import localization
use crate::localization::t_lang;

use crate::config::MAX_MESSAGE_LENGTH;

use crate::quiz::QuizPrompt;
use crate::resolver::format_pair;
use crate::session::VocabularyEntry;
use crate::trainer::TranslationPrompt;

/// Escape an example sentence for HTML and show the provider's emphasis as code
pub fn example_html(text: &str) -> String {
    html::escape(text)
        .replace("&lt;em&gt;", "<code>")
        .replace("&lt;/em&gt;", "</code>")
}

/// Body of a translation message: example pairs, or the first candidate if there are none
pub fn format_translation_message(prompt: &TranslationPrompt) -> String {
    if prompt.examples.is_empty() {
        return prompt
            .candidates
            .first()
            .map(|candidate| html::escape(candidate))
            .unwrap_or_else(|| html::escape(&prompt.term));
    }

    prompt
        .examples
        .iter()
        .map(|(source, target)| format!("– {}\n– {}", example_html(source), example_html(target)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// One button per option, each on its own row
pub fn create_translation_keyboard(options: &[(String, String)]) -> InlineKeyboardMarkup {
    let buttons = options
        .iter()
        .map(|(key, text)| vec![InlineKeyboardButton::callback(text.clone(), key.clone())])
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}

/// One button per quiz answer, in the prompt's (already shuffled) order
pub fn create_quiz_keyboard(prompt: &QuizPrompt) -> InlineKeyboardMarkup {
    let buttons = prompt
        .buttons
        .iter()
        .map(|button| {
            vec![InlineKeyboardButton::callback(
                button.label.clone(),
                button.answer.signal(),
            )]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}

/// `(label, callback data)` of every callback button on a keyboard
pub fn keyboard_buttons(markup: &InlineKeyboardMarkup) -> Vec<(String, String)> {
    markup
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|button| match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some((button.text.clone(), data.clone())),
            _ => None,
        })
        .collect()
}

/// Saved vocabulary as a list, oldest first
pub fn format_vocabulary_list(words: &[VocabularyEntry], language_code: Option<&str>) -> String {
    if words.is_empty() {
        return t_lang("list-empty", language_code);
    }

    let lines = words
        .iter()
        .map(|entry| format_pair(&entry.from, &entry.to))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}", t_lang("list-title", language_code), lines)
}

/// The vocabulary listing cut into messages Telegram accepts
pub fn vocabulary_list_messages(words: &[VocabularyEntry], language_code: Option<&str>) -> Vec<String> {
    split_message(&format_vocabulary_list(words, language_code), MAX_MESSAGE_LENGTH)
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Split `text` on line boundaries into chunks of at most `limit` UTF-16 units.
///
/// A single line longer than `limit` is cut between characters.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        for piece in split_long_line(line, limit) {
            let piece_len = utf16_len(&piece);
            if current_len > 0 && current_len + 1 + piece_len > limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push('\n');
                current_len += 1;
            }
            current.push_str(&piece);
            current_len += piece_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_long_line(line: &str, limit: usize) -> Vec<String> {
    if utf16_len(line) <= limit {
        return vec![line.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_len = 0;
    for c in line.chars() {
        if piece_len > 0 && piece_len + c.len_utf16() > limit {
            pieces.push(std::mem::take(&mut piece));
            piece_len = 0;
        }
        piece.push(c);
        piece_len += c.len_utf16();
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
