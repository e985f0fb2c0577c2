//! # Integration Tests
//!
//! End-to-end tests of the trainer: a text message goes through a fake translation
//! gateway into the request tracker, a button press confirms an option, and the quiz is
//! played against the saved vocabulary.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vocab_trainer::config::{GatewayConfig, TrainerConfig};
use vocab_trainer::errors::{TrainerError, TrainerResult};
use vocab_trainer::quiz::{QuizAnswer, CORRECT_ANSWER, WRONG_ANSWER};
use vocab_trainer::resolver::FollowUp;
use vocab_trainer::session::VocabularyEntry;
use vocab_trainer::session_store::{InMemorySessionStore, SessionStore};
use vocab_trainer::trainer::Trainer;
use vocab_trainer::translation::{TranslationCandidate, TranslationGateway, TranslationResult};

const CHAT: i64 = 42;

/// Gateway answering from a fixed table; unknown input yields an empty result
struct FakeGateway {
    answers: HashMap<String, TranslationResult>,
    fail: bool,
    calls: AtomicUsize,
    last_direction: std::sync::Mutex<Option<(String, String)>>,
}

impl FakeGateway {
    fn new() -> Self {
        let mut answers = HashMap::new();
        answers.insert(
            "hello".to_string(),
            TranslationResult {
                results: vec![
                    TranslationCandidate::new("привет")
                        .with_example("<em>Hello</em>, John", "<em>Привет</em>, Джон"),
                    TranslationCandidate::new("здравствуйте")
                        .with_example("<em>Hello</em>, sir", "<em>Здравствуйте</em>, сэр"),
                    TranslationCandidate::new("привет"),
                ],
            },
        );
        answers.insert(
            "кошка".to_string(),
            TranslationResult {
                results: vec![TranslationCandidate::new("cat")],
            },
        );
        Self {
            answers,
            fail: false,
            calls: AtomicUsize::new(0),
            last_direction: std::sync::Mutex::new(None),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

#[async_trait]
impl TranslationGateway for FakeGateway {
    async fn translate(
        &self,
        input: &str,
        source: &str,
        target: &str,
    ) -> TrainerResult<TranslationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_direction.lock().unwrap() = Some((source.to_string(), target.to_string()));
        if self.fail {
            return Err(TrainerError::Gateway("503 Service Unavailable".to_string()));
        }
        Ok(self.answers.get(input).cloned().unwrap_or_default())
    }

    fn provider_name(&self) -> &str {
        "Fake"
    }
}

fn setup(gateway: FakeGateway, config: TrainerConfig) -> (Trainer, Arc<InMemorySessionStore>, Arc<FakeGateway>) {
    let store = Arc::new(InMemorySessionStore::new());
    let gateway = Arc::new(gateway);
    let trainer = Trainer::new(store.clone(), gateway.clone(), config);
    (trainer, store, gateway)
}

#[tokio::test]
async fn test_translate_tracks_options() {
    let (trainer, store, gateway) = setup(FakeGateway::new(), TrainerConfig::default());

    let prompt = trainer.translate_term(CHAT, "hello").await.unwrap();

    assert_eq!(prompt.candidates, vec!["привет", "здравствуйте"]);
    assert_eq!(prompt.options.len(), 2 + 4);
    assert_eq!(prompt.options[0].1, "привет");
    assert_eq!(prompt.options[1].1, "здравствуйте");
    for (_, combined) in &prompt.options[2..] {
        assert_eq!(combined, "привет, здравствуйте");
    }
    assert_eq!(prompt.examples.len(), 2);
    assert_eq!(
        *gateway.last_direction.lock().unwrap(),
        Some(("eng".to_string(), "rus".to_string()))
    );

    let session = store.load(CHAT).await.unwrap();
    let request = &session.requests[&prompt.request_id];
    assert_eq!(request.term, "hello");
    assert_eq!(request.variants.len(), 6);
    for (i, (key, text)) in prompt.options.iter().enumerate() {
        assert_eq!(key, &format!("{}:{}", prompt.request_id, i));
        assert_eq!(&request.variants[key], text);
    }
}

#[tokio::test]
async fn test_cyrillic_input_translates_to_learning_language() {
    let (trainer, _store, gateway) = setup(FakeGateway::new(), TrainerConfig::default());

    let prompt = trainer.translate_term(CHAT, "кошка").await.unwrap();
    assert_eq!(prompt.options.len(), 1 + 4);
    assert_eq!(
        *gateway.last_direction.lock().unwrap(),
        Some(("rus".to_string(), "eng".to_string()))
    );
}

#[tokio::test]
async fn test_confirm_option_adds_exactly_one_entry() {
    let (trainer, store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    let prompt = trainer.translate_term(CHAT, "hello").await.unwrap();

    let (key, text) = prompt.options[1].clone();
    let resolution = trainer.resolve_callback(CHAT, &key, None, &[]).await.unwrap();

    assert_eq!(resolution.edited_text, "👍 hello ↔ здравствуйте");
    assert_eq!(resolution.follow_up, FollowUp::None);
    assert_eq!(resolution.added, Some(VocabularyEntry::new("hello", text)));

    let session = store.load(CHAT).await.unwrap();
    assert_eq!(session.words, vec![VocabularyEntry::new("hello", "здравствуйте")]);
    assert!(!session.requests.contains_key(&prompt.request_id));
}

#[tokio::test]
async fn test_second_press_on_resolved_request_is_stale() {
    let (trainer, store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    let prompt = trainer.translate_term(CHAT, "hello").await.unwrap();

    trainer
        .resolve_callback(CHAT, &prompt.options[0].0, None, &[])
        .await
        .unwrap();
    let again = trainer
        .resolve_callback(CHAT, &prompt.options[1].0, None, &[])
        .await;

    assert!(matches!(again, Err(TrainerError::StaleRequest(_))));
    assert_eq!(store.load(CHAT).await.unwrap().words.len(), 1);
}

#[tokio::test]
async fn test_unknown_request_is_stale_and_leaves_vocabulary() {
    let (trainer, store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    let prompt = trainer.translate_term(CHAT, "hello").await.unwrap();
    trainer
        .resolve_callback(CHAT, &prompt.options[0].0, None, &[])
        .await
        .unwrap();

    let result = trainer
        .resolve_callback(CHAT, "00000000-0000-0000-0000-000000000000:0", None, &[])
        .await;

    assert!(matches!(result, Err(TrainerError::StaleRequest(_))));
    assert_eq!(store.load(CHAT).await.unwrap().words.len(), 1);
}

#[tokio::test]
async fn test_gateway_failure_keeps_phase_one_record() {
    let (trainer, store, _gateway) = setup(FakeGateway::failing(), TrainerConfig::default());

    let result = trainer.translate_term(CHAT, "hello").await;
    assert!(matches!(result, Err(TrainerError::Gateway(_))));

    let session = store.load(CHAT).await.unwrap();
    assert_eq!(session.requests.len(), 1);
    let request = session.requests.values().next().unwrap();
    assert_eq!(request.term, "hello");
    assert!(request.variants.is_empty());
}

#[tokio::test]
async fn test_empty_gateway_result_is_no_candidates() {
    let (trainer, store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());

    let result = trainer.translate_term(CHAT, "qwertyuiop").await;
    assert_eq!(result, Err(TrainerError::NoCandidates("qwertyuiop".to_string())));
    assert!(store.load(CHAT).await.unwrap().words.is_empty());
}

#[tokio::test]
async fn test_circuit_opens_after_repeated_failures() {
    let config = TrainerConfig {
        gateway: GatewayConfig {
            circuit_breaker_threshold: 2,
            circuit_breaker_reset_secs: 600,
            ..Default::default()
        },
        ..Default::default()
    };
    let (trainer, _store, gateway) = setup(FakeGateway::failing(), config);

    for _ in 0..3 {
        assert!(trainer.translate_term(CHAT, "hello").await.is_err());
    }
    // The third call fails fast without reaching the provider
    assert_eq!(gateway.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_request_retention_is_bounded() {
    let config = TrainerConfig {
        max_tracked_requests: 3,
        ..Default::default()
    };
    let (trainer, store, _gateway) = setup(FakeGateway::new(), config);

    for _ in 0..10 {
        trainer.translate_term(CHAT, "hello").await.unwrap();
    }

    assert!(store.load(CHAT).await.unwrap().requests.len() <= 3);
}

#[tokio::test]
async fn test_quiz_on_empty_vocabulary() {
    let (trainer, _store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    assert_eq!(
        trainer.next_question(CHAT).await,
        Err(TrainerError::EmptyVocabulary)
    );
}

#[tokio::test]
async fn test_quiz_with_one_word_has_only_correct_button() {
    let (trainer, _store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    let prompt = trainer.translate_term(CHAT, "hello").await.unwrap();
    trainer
        .resolve_callback(CHAT, &prompt.options[0].0, None, &[])
        .await
        .unwrap();

    let quiz = trainer.next_question(CHAT).await.unwrap();
    assert_eq!(quiz.question, "привет");
    assert_eq!(quiz.buttons.len(), 1);
    assert_eq!(quiz.buttons[0].label, "hello");
    assert_eq!(quiz.buttons[0].answer, QuizAnswer::Correct);
}

#[tokio::test]
async fn test_quiz_answer_never_changes_vocabulary() {
    let (trainer, store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    store
        .update(CHAT, &mut |session| {
            session.words.push(VocabularyEntry::new("hello", "привет"));
            session.words.push(VocabularyEntry::new("cat", "кошка"));
            session.words.push(VocabularyEntry::new("dog", "собака"));
            Ok(())
        })
        .await
        .unwrap();

    let quiz = trainer.next_question(CHAT).await.unwrap();
    let buttons: Vec<(String, String)> = quiz
        .buttons
        .iter()
        .map(|b| (b.label.clone(), b.answer.signal().to_string()))
        .collect();
    let correct = quiz.correct_label().unwrap().to_string();

    for signal in [CORRECT_ANSWER, WRONG_ANSWER] {
        let resolution = trainer
            .resolve_callback(CHAT, signal, Some(quiz.question.as_str()), &buttons)
            .await
            .unwrap();
        assert_eq!(resolution.follow_up, FollowUp::NextQuestion);
        assert!(resolution.edited_text.ends_with(&format!("{} ↔ {}", quiz.question, correct)));
        assert_eq!(store.load(CHAT).await.unwrap().words.len(), 3);
    }
}

#[tokio::test]
async fn test_quiz_answer_on_inaccessible_message_is_stale() {
    let (trainer, _store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    let result = trainer.resolve_callback(CHAT, CORRECT_ANSWER, None, &[]).await;
    assert!(matches!(result, Err(TrainerError::StaleRequest(_))));
}

#[tokio::test]
async fn test_sessions_are_isolated_per_chat() {
    let (trainer, store, _gateway) = setup(FakeGateway::new(), TrainerConfig::default());
    let prompt = trainer.translate_term(CHAT, "hello").await.unwrap();

    let other_chat = CHAT + 1;
    let result = trainer
        .resolve_callback(other_chat, &prompt.options[0].0, None, &[])
        .await;

    assert!(matches!(result, Err(TrainerError::StaleRequest(_))));
    assert!(store.load(other_chat).await.unwrap().words.is_empty());
    assert!(store.load(CHAT).await.unwrap().words.is_empty());
}
