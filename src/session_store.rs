//! # Session Store Module
//!
//! Per-chat session persistence. Every change to a session goes through
//! [`SessionStore::update`], which reads the whole session, applies the mutation and writes
//! it back as one step. A mutation that returns an error is discarded and nothing is
//! written.
//!
//! Back-ends:
//! - [`InMemorySessionStore`]: process-local map, used by tests
//! - [`JsonFileSessionStore`]: all sessions in a single JSON document on disk
//! - [`crate::db::PgSessionStore`]: one row per chat in PostgreSQL

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::{TrainerError, TrainerResult};
use crate::session::Session;

/// Sessions are keyed by chat id
pub type SessionKey = i64;

/// A mutation applied to a session inside one read-modify-write cycle
pub type SessionMutation<'a> = &'a mut (dyn FnMut(&mut Session) -> TrainerResult<()> + Send);

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session for `key`, or an empty one if none was stored yet
    async fn load(&self, key: SessionKey) -> TrainerResult<Session>;

    /// Apply `mutate` to the session for `key` atomically
    async fn update(&self, key: SessionKey, mutate: SessionMutation<'_>) -> TrainerResult<()>;
}

/// Run `f` against the stored session and return its result.
///
/// Convenience over [`SessionStore::update`] for mutations that produce a value.
pub async fn modify_session<T, F>(store: &dyn SessionStore, key: SessionKey, mut f: F) -> TrainerResult<T>
where
    T: Send,
    F: FnMut(&mut Session) -> TrainerResult<T> + Send,
{
    let mut output = None;
    store
        .update(key, &mut |session| {
            output = Some(f(session)?);
            Ok(())
        })
        .await?;

    output.ok_or_else(|| TrainerError::Storage("Session mutation was not applied".to_string()))
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionKey, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, key: SessionKey) -> TrainerResult<Session> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(&key).cloned().unwrap_or_default())
    }

    async fn update(&self, key: SessionKey, mutate: SessionMutation<'_>) -> TrainerResult<()> {
        let mut sessions = self.sessions.lock().await;
        let mut session = sessions.get(&key).cloned().unwrap_or_default();
        mutate(&mut session)?;
        sessions.insert(key, session);
        Ok(())
    }
}

/// Session store backed by a single JSON document.
///
/// The document is replaced atomically on every update: it is written to a temporary file
/// in the same directory and then renamed over the original.
#[derive(Debug)]
pub struct JsonFileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

type SessionDocument = BTreeMap<SessionKey, Session>;

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> TrainerResult<SessionDocument> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(SessionDocument::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionDocument::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &SessionDocument) -> TrainerResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut temp_file = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(temp_file.as_file_mut(), document)?;
        temp_file.as_file_mut().flush()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), sessions = document.len(), "Session file written");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn load(&self, key: SessionKey) -> TrainerResult<Session> {
        let _guard = self.lock.lock().await;
        let document = self.read_document()?;
        Ok(document.get(&key).cloned().unwrap_or_default())
    }

    async fn update(&self, key: SessionKey, mutate: SessionMutation<'_>) -> TrainerResult<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document()?;
        let mut session = document.get(&key).cloned().unwrap_or_default();
        mutate(&mut session)?;
        document.insert(key, session);
        self.write_document(&document)
    }
}
