//! # Vocabulary Trainer Telegram Bot
//!
//! A Telegram bot that translates words and phrases with usage examples, stores the
//! translation the user confirms, and quizzes the user on their saved vocabulary with
//! multiple-choice questions.

pub mod bot;
pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod errors;
pub mod localization;
pub mod quiz;
pub mod resolver;
pub mod session;
pub mod session_store;
pub mod trainer;
pub mod translation;
pub mod variants;
