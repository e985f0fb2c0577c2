//! # Localization Tests
//!
//! This module contains unit tests for the localization functionality,
//! testing message retrieval and formatting with various edge cases.

use std::collections::HashMap;
use vocab_trainer::localization::LocalizationManager;

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_localization() -> LocalizationManager {
        // Create a new localization manager for each test
        LocalizationManager::new().expect("Failed to create localization manager")
    }

    #[test]
    fn test_get_message_existing_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("help-commands", "en", None);
        assert_eq!(message, "Commands:");
    }

    #[test]
    fn test_get_message_nonexistent_key() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("nonexistent-key", "en", None);
        assert!(message.starts_with("Missing translation:"));
    }

    #[test]
    fn test_welcome_commands_header_comes_from_help() {
        let manager = setup_localization();

        // The welcome text reuses the help header; there is no separate key for it
        for language in ["en", "ru"] {
            let message = manager.get_message_in_language("welcome-commands", language, None);
            assert!(message.starts_with("Missing translation:"));
        }
    }

    #[test]
    fn test_get_message_unsupported_language() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("help-commands", "unsupported", None);
        // Should fall back to English
        assert_eq!(message, "Commands:");
    }

    #[test]
    fn test_get_message_with_args() {
        let manager = setup_localization();

        let mut args = HashMap::new();
        args.insert("term", "qwerty");

        let message = manager.get_message_in_language("no-translations-found", "en", Some(&args));
        assert_eq!(message, "No translations found for \"qwerty\".");
    }

    #[test]
    fn test_get_message_missing_args() {
        let manager = setup_localization();

        // Missing variables are rendered as placeholders rather than failing
        let message = manager.get_message_in_language("no-translations-found", "en", None);
        assert!(message.starts_with("No translations found"));
    }

    #[test]
    fn test_russian_localization() {
        let manager = setup_localization();

        let message = manager.get_message_in_language("no-words-to-learn", "ru", None);
        assert_eq!(message, "Нет слов для изучения");

        let english_message = manager.get_message_in_language("no-words-to-learn", "en", None);
        assert_eq!(english_message, "No words to learn");
    }

    #[test]
    fn test_every_english_key_has_russian_text() {
        let manager = setup_localization();

        for key in [
            "welcome-title",
            "help-commands",
            "help-learn",
            "list-title",
            "list-empty",
            "request-expired",
            "error-translation-failed",
            "error-processing-failed",
        ] {
            let russian = manager.get_message_in_language(key, "ru", None);
            assert!(!russian.starts_with("Missing"), "{key} missing in ru");
            assert_ne!(russian, manager.get_message(key, None), "{key} not translated");
        }
    }

    #[test]
    fn test_language_detection() {
        use vocab_trainer::localization::detect_language;

        assert_eq!(detect_language(Some("en")), "en");
        assert_eq!(detect_language(Some("en-US")), "en");
        assert_eq!(detect_language(Some("ru")), "ru");
        assert_eq!(detect_language(Some("ru-RU")), "ru");
        assert_eq!(detect_language(Some("RU")), "ru");
        assert_eq!(detect_language(None), "en"); // Default to English
        assert_eq!(detect_language(Some("fr")), "en"); // Fallback to English
    }

    #[test]
    fn test_convenience_functions() {
        // Initialize the global localization manager for this test
        vocab_trainer::localization::init_localization().expect("Failed to initialize localization");

        let message = vocab_trainer::localization::t_lang("list-title", Some("en"));
        assert_eq!(message, "Recently added words");

        let args = vec![("term", "кошка")];
        let message_with_args =
            vocab_trainer::localization::t_args_lang("no-translations-found", &args, Some("ru"));
        assert!(message_with_args.contains("кошка"));
        assert!(!message_with_args.starts_with("No translations"));
    }
}
