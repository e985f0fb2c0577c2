//! # Translation Gateway Module
//!
//! This module defines the `TranslationGateway` trait the trainer talks to, the result
//! types it returns, and `ReversoGateway`, the HTTP implementation backed by the Reverso
//! context-translation API.
//!
//! # Language pivot
//!
//! The trainer works with exactly two languages. Input containing a Latin letter is
//! treated as the learning language and translated into the native one; anything else goes
//! the other way. See [`LanguagePair::detect`].

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::errors::{TrainerError, TrainerResult};

lazy_static! {
    static ref LATIN_LETTER: Regex = Regex::new(r"(?i)[a-z]").expect("valid latin letter pattern");
}

/// One translation candidate with its aligned usage examples
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationCandidate {
    pub translation: String,
    #[serde(default)]
    pub source_examples: Vec<String>,
    #[serde(default)]
    pub target_examples: Vec<String>,
}

impl TranslationCandidate {
    pub fn new(translation: impl Into<String>) -> Self {
        Self {
            translation: translation.into(),
            ..Default::default()
        }
    }

    pub fn with_example(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_examples.push(source.into());
        self.target_examples.push(target.into());
        self
    }
}

/// Everything the provider returned for one query; `results` may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationResult {
    pub results: Vec<TranslationCandidate>,
}

impl TranslationResult {
    /// Candidate texts in provider order, duplicates included
    pub fn candidates(&self) -> Vec<&str> {
        self.results
            .iter()
            .map(|result| result.translation.as_str())
            .collect()
    }

    /// Aligned `(source, target)` example pairs across all candidates, at most `limit`
    pub fn example_pairs(&self, limit: usize) -> Vec<(&str, &str)> {
        self.results
            .iter()
            .flat_map(|result| {
                result
                    .source_examples
                    .iter()
                    .zip(result.target_examples.iter())
                    .map(|(source, target)| (source.as_str(), target.as_str()))
            })
            .take(limit)
            .collect()
    }
}

/// Source and target language codes of one translation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    /// Choose the direction for `text` between the learning and native languages
    pub fn detect(text: &str, learning: &str, native: &str) -> Self {
        if LATIN_LETTER.is_match(text) {
            Self {
                source: learning.to_string(),
                target: native.to_string(),
            }
        } else {
            Self {
                source: native.to_string(),
                target: learning.to_string(),
            }
        }
    }
}

/// Remote translation provider
#[async_trait]
pub trait TranslationGateway: Send + Sync {
    /// Translate `input` from `source` to `target`.
    ///
    /// An empty result set is a successful answer; failures of the remote call are
    /// reported as `TrainerError::Gateway`.
    async fn translate(&self, input: &str, source: &str, target: &str)
        -> TrainerResult<TranslationResult>;

    /// Name used in logs
    fn provider_name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReversoResponse {
    #[serde(default)]
    translation: Vec<String>,
    #[serde(default)]
    context_results: Option<ReversoContextResults>,
}

#[derive(Debug, Default, Deserialize)]
struct ReversoContextResults {
    #[serde(default)]
    results: Vec<TranslationCandidate>,
}

impl From<ReversoResponse> for TranslationResult {
    fn from(response: ReversoResponse) -> Self {
        let results = response
            .context_results
            .map(|context| context.results)
            .unwrap_or_default();

        // Sentences usually come back without context results, only a plain translation
        if results.is_empty() {
            return TranslationResult {
                results: response
                    .translation
                    .into_iter()
                    .filter(|t| !t.trim().is_empty())
                    .map(TranslationCandidate::new)
                    .collect(),
            };
        }

        TranslationResult { results }
    }
}

/// Reverso context-translation client
#[derive(Clone)]
pub struct ReversoGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl ReversoGateway {
    pub fn new(config: &GatewayConfig) -> TrainerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0 (compatible; vocab-trainer)")
            .build()
            .map_err(|e| TrainerError::Gateway(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    fn request_body(input: &str, source: &str, target: &str) -> serde_json::Value {
        json!({
            "format": "text",
            "from": source,
            "to": target,
            "input": input,
            "options": {
                "sentenceSplitter": true,
                "origin": "translation.web",
                "contextResults": true,
                "languageDetection": true
            }
        })
    }
}

#[async_trait]
impl TranslationGateway for ReversoGateway {
    async fn translate(
        &self,
        input: &str,
        source: &str,
        target: &str,
    ) -> TrainerResult<TranslationResult> {
        debug!(source, target, input_length = input.len(), "Calling translation provider");

        let response = self
            .client
            .post(&self.endpoint)
            .header("accept", "application/json, text/plain, */*")
            .header("x-reverso-origin", "translation.web")
            .json(&Self::request_body(input, source, target))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Translation provider returned non-success status");
            return Err(TrainerError::Gateway(format!("Translation API error ({status})")));
        }

        let body: ReversoResponse = response.json().await.map_err(|e| {
            TrainerError::Gateway(format!("Failed to parse translation response: {e}"))
        })?;

        Ok(body.into())
    }

    fn provider_name(&self) -> &str {
        "Reverso"
    }
}
