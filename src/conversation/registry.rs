use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::session::{Session, SessionTemplate};
use super::types::{Message, Role};
use crate::error::Result;

pub type SessionId = Uuid;

pub const DEFAULT_MAX_SESSIONS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Waiting,
}

/// Shared access to one session. Submissions hold the session lock for the
/// whole backend call, so a session never has two requests in flight.
///
/// Readers see a copy of the transcript that is refreshed around each
/// submission, and never wait on the lock.
#[derive(Clone)]
pub struct SessionHandle {
    id: SessionId,
    inner: Arc<AsyncMutex<Session>>,
    snapshot: Arc<RwLock<Vec<Message>>>,
}

impl SessionHandle {
    fn new(id: SessionId, session: Session) -> SessionHandle {
        let snapshot = session.transcript().to_vec();
        SessionHandle {
            id,
            inner: Arc::new(AsyncMutex::new(session)),
            snapshot: Arc::new(RwLock::new(snapshot)),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub async fn submit(&self, text: &str) -> Result<String> {
        let mut session = self.inner.lock().await;
        // the session appends the user turn before its first await
        self.snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Message::user(text));
        let result = session.submit(text).await;
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) =
            session.transcript().to_vec();
        result
    }

    pub fn transcript(&self) -> Vec<Message> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything but the system message.
    pub fn display_transcript(&self) -> Vec<Message> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|m| m.role() != Role::System)
            .cloned()
            .collect()
    }

    /// `Waiting` while a submission holds the session.
    pub fn state(&self) -> SessionState {
        match self.inner.try_lock() {
            Ok(_) => SessionState::Idle,
            Err(_) => SessionState::Waiting,
        }
    }
}

/// Live sessions keyed by id, up to a fixed number at once.
pub struct SessionRegistry {
    template: SessionTemplate,
    max_sessions: usize,
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(template: SessionTemplate) -> SessionRegistry {
        SessionRegistry::with_max_sessions(template, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_max_sessions(template: SessionTemplate, max_sessions: usize) -> SessionRegistry {
        SessionRegistry {
            template,
            max_sessions,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Starts a cold session under a fresh id. `None` when the registry is full.
    pub fn open(&self) -> Option<SessionHandle> {
        let mut sessions = self.lock();
        if sessions.len() >= self.max_sessions {
            warn!(open = sessions.len(), "session limit reached");
            return None;
        }
        let handle = SessionHandle::new(Uuid::new_v4(), self.template.spawn());
        sessions.insert(handle.id, handle.clone());
        info!(session = %handle.id, open = sessions.len(), "session opened");
        Some(handle)
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.lock().get(id).cloned()
    }

    /// Forgets a session. Returns false when the id was unknown.
    pub fn close(&self, id: &SessionId) -> bool {
        let mut sessions = self.lock();
        let removed = sessions.remove(id).is_some();
        if removed {
            info!(session = %id, open = sessions.len(), "session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
        // every mutation is a single insert or remove, so a poisoned map is still whole
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::conversation::backend::{scripted::ScriptedBackend, CompletionBackend, CompletionParams};
    use crate::conversation::persona::{Persona, Surface};

    fn template(backend: Arc<dyn CompletionBackend>) -> SessionTemplate {
        SessionTemplate::new(backend, Persona::scrum_master(Surface::Web))
    }

    fn registry(backend: Arc<dyn CompletionBackend>) -> SessionRegistry {
        SessionRegistry::new(template(backend))
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = registry(Arc::new(ScriptedBackend::new().reply("only for a")));
        let a = registry.open().unwrap();
        let b = registry.open().unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);

        a.submit("hello").await.unwrap();
        assert_eq!(a.transcript().len(), 4);
        assert_eq!(b.transcript().len(), 2);

        let display = a.display_transcript();
        assert!(display.iter().all(|m| m.role() != Role::System));
        assert_eq!(display.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_submit_refreshes_snapshot() {
        let registry = registry(Arc::new(ScriptedBackend::new().fail("offline")));
        let handle = registry.open().unwrap();
        assert!(handle.submit("oi").await.is_err());
        assert_eq!(handle.transcript().len(), 3);
        assert_eq!(handle.transcript().last(), Some(&Message::user("oi")));
        assert_eq!(handle.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_close_forgets_session() {
        let registry = registry(Arc::new(ScriptedBackend::new()));
        let handle = registry.open().unwrap();
        assert!(registry.get(&handle.id()).is_some());
        assert!(registry.close(&handle.id()));
        assert!(!registry.close(&handle.id()));
        assert!(registry.get(&handle.id()).is_none());
        assert!(registry.is_empty());

        let fresh = registry.open().unwrap();
        assert_eq!(fresh.transcript().len(), 2);
    }

    #[test]
    fn test_open_refuses_past_limit() {
        let registry =
            SessionRegistry::with_max_sessions(template(Arc::new(ScriptedBackend::new())), 2);
        let first = registry.open().unwrap();
        registry.open().unwrap();
        assert!(registry.open().is_none());
        assert_eq!(registry.len(), 2);

        registry.close(&first.id());
        assert!(registry.open().is_some());
    }

    /// Holds every call until released.
    struct GatedBackend {
        gate: Notify,
    }

    #[async_trait]
    impl CompletionBackend for GatedBackend {
        async fn complete(&self, messages: &[Message], _: &CompletionParams) -> Result<String> {
            self.gate.notified().await;
            Ok(format!("seen {}", messages.len()))
        }
    }

    #[tokio::test]
    async fn test_state_and_reads_while_request_in_flight() {
        let backend = Arc::new(GatedBackend { gate: Notify::new() });
        let registry = registry(backend.clone());
        let handle = registry.open().unwrap();
        assert_eq!(handle.state(), SessionState::Idle);

        let pending = tokio::spawn({
            let handle = handle.clone();
            async move { handle.submit("bloqueado no deploy").await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(handle.state(), SessionState::Waiting);
        let shown = handle.display_transcript();
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1], Message::user("bloqueado no deploy"));

        backend.gate.notify_one();
        assert_eq!(pending.await.unwrap().unwrap(), "seen 3");
        assert_eq!(handle.state(), SessionState::Idle);
        assert_eq!(handle.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_requests_within_a_session_are_serialized() {
        let backend = Arc::new(GatedBackend { gate: Notify::new() });
        let registry = registry(backend.clone());
        let handle = registry.open().unwrap();

        let first = tokio::spawn({
            let handle = handle.clone();
            async move { handle.submit("one").await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let second = tokio::spawn({
            let handle = handle.clone();
            async move { handle.submit("two").await }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        backend.gate.notify_one();
        assert_eq!(first.await.unwrap().unwrap(), "seen 3");
        tokio::time::sleep(Duration::from_millis(20)).await;
        backend.gate.notify_one();
        assert_eq!(second.await.unwrap().unwrap(), "seen 5");

        assert_eq!(handle.state(), SessionState::Idle);
        assert_eq!(handle.transcript().len(), 6);
    }
}
