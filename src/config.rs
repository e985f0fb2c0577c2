//! # Trainer Configuration Module
//!
//! This module defines configuration structures for the trainer: translation gateway
//! settings, request retention, quiz sizing, and the environment-driven bot settings.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

// Constants for trainer configuration
pub const DEFAULT_TRANSLATION_ENDPOINT: &str = "https://api.reverso.net/translate/v1/translation";
pub const DEFAULT_LEARNING_LANGUAGE: &str = "eng";
pub const DEFAULT_NATIVE_LANGUAGE: &str = "rus";
pub const DEFAULT_SESSION_FILE: &str = "./data/storage.json";
pub const COMBINED_VARIANT_COUNT: usize = 4;
pub const COMBINED_VARIANT_SIZE: usize = 2;
pub const QUIZ_DISTRACTOR_COUNT: usize = 3;
pub const MAX_EXAMPLES: usize = 4;
pub const MAX_TRACKED_REQUESTS: usize = 32;
/// Telegram's limit on message text, counted in UTF-16 code units
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Translation gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Translation API endpoint
    pub endpoint: String,
    /// Timeout for a single translation call in seconds
    pub timeout_secs: u64,
    /// Consecutive failures before the circuit opens
    pub circuit_breaker_threshold: u32,
    /// Time before an open circuit lets calls through again, in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TRANSLATION_ENDPOINT.to_string(),
            timeout_secs: 30,
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration structure for the trainer core
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Language the user is learning (Latin script input is treated as this language)
    pub learning_language: String,
    /// The user's own language
    pub native_language: String,
    /// Number of synthetic combined options appended to the real translations
    pub combined_variants: usize,
    /// Number of translations joined into one combined option
    pub combined_variant_size: usize,
    /// Maximum number of wrong-answer buttons in a quiz prompt
    pub quiz_distractors: usize,
    /// Maximum number of example pairs shown with a translation
    pub max_examples: usize,
    /// Maximum number of pending translation requests kept per session
    pub max_tracked_requests: usize,
    /// Gateway settings
    pub gateway: GatewayConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_language: DEFAULT_LEARNING_LANGUAGE.to_string(),
            native_language: DEFAULT_NATIVE_LANGUAGE.to_string(),
            combined_variants: COMBINED_VARIANT_COUNT,
            combined_variant_size: COMBINED_VARIANT_SIZE,
            quiz_distractors: QUIZ_DISTRACTOR_COUNT,
            max_examples: MAX_EXAMPLES,
            max_tracked_requests: MAX_TRACKED_REQUESTS,
            gateway: GatewayConfig::default(),
        }
    }
}

/// Where sessions are persisted
#[derive(Debug, Clone, PartialEq)]
pub enum StorageBackend {
    /// A single JSON document on disk
    File(PathBuf),
    /// PostgreSQL database URL
    Postgres(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Process-level settings read from the environment
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub storage: StorageBackend,
    pub log_format: LogFormat,
    pub trainer: TrainerConfig,
}

impl BotConfig {
    /// Load settings from environment variables, falling back to defaults for tunables
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;

        let storage = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => StorageBackend::Postgres(url),
            _ => StorageBackend::File(
                env::var("SESSION_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_FILE)),
            ),
        };

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        let defaults = TrainerConfig::default();
        let trainer = TrainerConfig {
            learning_language: env::var("LEARNING_LANGUAGE")
                .unwrap_or(defaults.learning_language),
            native_language: env::var("NATIVE_LANGUAGE").unwrap_or(defaults.native_language),
            max_tracked_requests: parse_var("MAX_TRACKED_REQUESTS", defaults.max_tracked_requests)?,
            gateway: GatewayConfig {
                endpoint: env::var("TRANSLATION_ENDPOINT").unwrap_or(defaults.gateway.endpoint),
                timeout_secs: parse_var("GATEWAY_TIMEOUT_SECS", defaults.gateway.timeout_secs)?,
                ..defaults.gateway
            },
            ..defaults
        };

        Ok(Self {
            bot_token,
            storage,
            log_format,
            trainer,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {name}: {raw}")),
        Err(_) => Ok(default),
    }
}
