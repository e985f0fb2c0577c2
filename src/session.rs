//! # Session Module
//!
//! Per-chat state persisted by the session store: the confirmed vocabulary and the
//! translation requests still waiting for a button press.
//!
//! The request tracker lives here too. A request is written in two phases: the term is
//! recorded as soon as the message arrives, and the option list is attached once the
//! variants have been generated. Confirmed requests are dropped, and the number of pending
//! requests is capped so a session cannot grow without bound.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::{TrainerError, TrainerResult};

/// Separator between request id and option index in callback data
pub const VARIANT_KEY_SEPARATOR: char = ':';

/// A confirmed source-term/translation pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub from: String,
    pub to: String,
}

impl VocabularyEntry {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A translation query waiting for the user to pick one of its options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub id: String,
    pub term: String,
    /// Option texts keyed by `"<id>:<index>"`
    #[serde(default)]
    pub variants: HashMap<String, String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// All persisted state belonging to one chat
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub words: Vec<VocabularyEntry>,
    #[serde(default)]
    pub requests: HashMap<String, TranslationRequest>,
}

/// Generate a fresh request identifier
pub fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Build the composite callback key for option `index` of request `id`
pub fn variant_key(id: &str, index: usize) -> String {
    format!("{id}{VARIANT_KEY_SEPARATOR}{index}")
}

/// Recover the request id from a composite callback key
pub fn request_id_of(key: &str) -> Option<&str> {
    key.split_once(VARIANT_KEY_SEPARATOR)
        .map(|(id, _)| id)
        .filter(|id| !id.is_empty())
}

impl Session {
    /// Phase one: record the term under a new request id.
    ///
    /// Evicts the oldest pending requests first so that, including the new one, at most
    /// `max_tracked` requests remain.
    pub fn begin_request(&mut self, id: &str, term: &str, max_tracked: usize) {
        self.evict_oldest(max_tracked.saturating_sub(1));
        self.requests.insert(
            id.to_string(),
            TranslationRequest {
                id: id.to_string(),
                term: term.to_string(),
                variants: HashMap::new(),
                created_at: Utc::now(),
            },
        );
    }

    /// Phase two: overwrite the request with its indexed options.
    ///
    /// Returns the `(key, text)` pairs in option order, ready to be rendered as buttons.
    pub fn attach_variants(
        &mut self,
        id: &str,
        term: &str,
        options: &[String],
    ) -> Vec<(String, String)> {
        let keyed: Vec<(String, String)> = options
            .iter()
            .enumerate()
            .map(|(i, text)| (variant_key(id, i), text.clone()))
            .collect();

        let created_at = self
            .requests
            .get(id)
            .map(|request| request.created_at)
            .unwrap_or_else(Utc::now);

        self.requests.insert(
            id.to_string(),
            TranslationRequest {
                id: id.to_string(),
                term: term.to_string(),
                variants: keyed.iter().cloned().collect(),
                created_at,
            },
        );

        keyed
    }

    /// Resolve a composite key to the entry it would create, without mutating anything
    pub fn lookup_variant(&self, key: &str) -> TrainerResult<VocabularyEntry> {
        let id = request_id_of(key).ok_or_else(|| TrainerError::StaleRequest(key.to_string()))?;
        let request = self
            .requests
            .get(id)
            .ok_or_else(|| TrainerError::StaleRequest(key.to_string()))?;
        let to = request
            .variants
            .get(key)
            .ok_or_else(|| TrainerError::StaleRequest(key.to_string()))?;

        Ok(VocabularyEntry::new(request.term.clone(), to.clone()))
    }

    /// Confirm the option behind `key`: append it to the vocabulary and retire the request
    pub fn confirm_variant(&mut self, key: &str) -> TrainerResult<VocabularyEntry> {
        let entry = self.lookup_variant(key)?;
        self.words.push(entry.clone());
        if let Some(id) = request_id_of(key) {
            self.requests.remove(id);
        }
        Ok(entry)
    }

    /// Drop the oldest requests until at most `keep` remain
    fn evict_oldest(&mut self, keep: usize) {
        if self.requests.len() <= keep {
            return;
        }

        let mut by_age: Vec<(DateTime<Utc>, String)> = self
            .requests
            .values()
            .map(|request| (request.created_at, request.id.clone()))
            .collect();
        by_age.sort();

        let excess = self.requests.len() - keep;
        for (_, id) in by_age.into_iter().take(excess) {
            self.requests.remove(&id);
        }
    }
}
