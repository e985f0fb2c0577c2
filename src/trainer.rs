//! # Trainer Module
//!
//! Transport-independent entry points of the vocabulary trainer. The Telegram layer turns
//! updates into calls on [`Trainer`] and renders whatever comes back; everything with state
//! or ordering concerns happens here.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::circuit_breaker::CircuitBreaker;
use crate::config::TrainerConfig;
use crate::errors::{TrainerError, TrainerResult};
use crate::quiz::{build_quiz, QuizPrompt};
use crate::resolver::{resolve_confirmation, resolve_quiz_answer, CallbackSignal, Resolution};
use crate::session::{new_request_id, VocabularyEntry};
use crate::session_store::{modify_session, SessionKey, SessionStore};
use crate::translation::{LanguagePair, TranslationGateway, TranslationResult};
use crate::variants::{generate_variants, unique_candidates};

/// Everything needed to render a translation with its option buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPrompt {
    pub request_id: String,
    pub term: String,
    /// Distinct candidates in provider order
    pub candidates: Vec<String>,
    /// Aligned `(source, target)` usage examples, still carrying provider markup
    pub examples: Vec<(String, String)>,
    /// `(callback key, option text)` in display order
    pub options: Vec<(String, String)>,
}

/// Text worth translating: trimmed, non-empty, and not a command
pub fn translatable_text(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with('/') {
        None
    } else {
        Some(trimmed)
    }
}

pub struct Trainer {
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn TranslationGateway>,
    breaker: CircuitBreaker,
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn TranslationGateway>,
        config: TrainerConfig,
    ) -> Self {
        Self {
            store,
            gateway,
            breaker: CircuitBreaker::new(&config.gateway),
            config,
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Translate `term` and track the generated options under a new request.
    ///
    /// The term is recorded before the gateway is called, and the options are attached once
    /// the variants exist. A gateway failure or an empty answer leaves only the first record.
    pub async fn translate_term(
        &self,
        chat_id: SessionKey,
        term: &str,
    ) -> TrainerResult<TranslationPrompt> {
        let request_id = new_request_id();
        let max_tracked = self.config.max_tracked_requests;

        self.store
            .update(chat_id, &mut |session| {
                session.begin_request(&request_id, term, max_tracked);
                Ok(())
            })
            .await?;
        debug!(chat_id, request_id = %request_id, "Translation request recorded");

        let pair = LanguagePair::detect(
            term,
            &self.config.learning_language,
            &self.config.native_language,
        );
        let result = self.call_gateway(term, &pair).await?;

        let candidates = unique_candidates(&result.candidates());
        if candidates.is_empty() {
            warn!(chat_id, request_id = %request_id, "Translation provider returned no candidates");
            return Err(TrainerError::NoCandidates(term.to_string()));
        }

        let options = generate_variants(
            &candidates,
            self.config.combined_variants,
            self.config.combined_variant_size,
            &mut rand::thread_rng(),
        );

        let keyed = modify_session(self.store.as_ref(), chat_id, |session| {
            Ok(session.attach_variants(&request_id, term, &options))
        })
        .await?;

        info!(
            chat_id,
            request_id = %request_id,
            candidates = candidates.len(),
            options = keyed.len(),
            "Translation options tracked"
        );

        let examples = result
            .example_pairs(self.config.max_examples)
            .into_iter()
            .map(|(source, target)| (source.to_string(), target.to_string()))
            .collect();

        Ok(TranslationPrompt {
            request_id,
            term: term.to_string(),
            candidates,
            examples,
            options: keyed,
        })
    }

    async fn call_gateway(&self, term: &str, pair: &LanguagePair) -> TrainerResult<TranslationResult> {
        if self.breaker.is_open() {
            warn!(provider = self.gateway.provider_name(), "Circuit open, skipping translation call");
            return Err(TrainerError::Gateway("circuit breaker is open".to_string()));
        }

        match self.gateway.translate(term, &pair.source, &pair.target).await {
            Ok(result) => {
                self.breaker.record_success();
                Ok(result)
            }
            Err(e) => {
                self.breaker.record_failure();
                warn!(provider = self.gateway.provider_name(), error = %e, "Translation call failed");
                Err(e)
            }
        }
    }

    /// Build the next quiz question from the chat's vocabulary
    pub async fn next_question(&self, chat_id: SessionKey) -> TrainerResult<QuizPrompt> {
        let session = self.store.load(chat_id).await?;
        let prompt = build_quiz(
            &session.words,
            self.config.quiz_distractors,
            &mut rand::thread_rng(),
        )?;
        debug!(chat_id, buttons = prompt.buttons.len(), "Quiz question built");
        Ok(prompt)
    }

    /// Saved vocabulary, oldest first
    pub async fn vocabulary(&self, chat_id: SessionKey) -> TrainerResult<Vec<VocabularyEntry>> {
        Ok(self.store.load(chat_id).await?.words)
    }

    /// Resolve a button press.
    ///
    /// `prompt_text` and `buttons` describe the message the button was attached to; buttons
    /// are `(label, callback data)` pairs. Only the quiz branch reads them.
    pub async fn resolve_callback(
        &self,
        chat_id: SessionKey,
        data: &str,
        prompt_text: Option<&str>,
        buttons: &[(String, String)],
    ) -> TrainerResult<Resolution> {
        match CallbackSignal::parse(data)? {
            CallbackSignal::QuizAnswer(answer) => {
                let prompt_text =
                    prompt_text.ok_or_else(|| TrainerError::StaleRequest(data.to_string()))?;
                let resolution = resolve_quiz_answer(
                    answer,
                    prompt_text,
                    buttons
                        .iter()
                        .map(|(label, signal)| (label.as_str(), signal.as_str())),
                )?;
                debug!(chat_id, answer = ?answer, "Quiz answer resolved");
                Ok(resolution)
            }
            CallbackSignal::ConfirmVariant { request_id, key } => {
                let resolution = modify_session(self.store.as_ref(), chat_id, |session| {
                    resolve_confirmation(session, &key)
                })
                .await?;
                info!(chat_id, request_id = %request_id, "Vocabulary entry added");
                Ok(resolution)
            }
        }
    }
}
