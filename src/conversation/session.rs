use std::sync::Arc;

use tracing::{debug, info};

use super::backend::{CompletionBackend, CompletionParams};
use super::persona::Persona;
use super::types::{Message, Role};
use crate::error::Result;

/// One conversation: the append-only transcript plus the backend it talks to.
///
/// The transcript always opens with the persona's system message followed by
/// its greeting.
pub struct Session {
    backend: Arc<dyn CompletionBackend>,
    params: CompletionParams,
    transcript: Vec<Message>,
    history_limit: Option<usize>,
}

impl Session {
    pub fn new(backend: Arc<dyn CompletionBackend>, persona: &Persona) -> Session {
        Session {
            backend,
            params: CompletionParams::default(),
            transcript: vec![
                Message::system(persona.instructions.as_str()),
                Message::assistant(persona.greeting.as_str()),
            ],
            history_limit: None,
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Session {
        self.params = params;
        self
    }

    /// Caps how many non-system messages go out with each request. The
    /// transcript itself keeps everything.
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Session {
        self.history_limit = limit;
        self
    }

    /// Records `text` as a user turn and asks the backend for the reply.
    ///
    /// The reply is appended and returned on success. On failure the user turn
    /// stays in the transcript without an answer.
    pub async fn submit(&mut self, text: &str) -> Result<String> {
        self.transcript.push(Message::user(text));

        let window = self.request_window();
        debug!(
            messages = window.len(),
            payload_bytes = payload_size(&window),
            "sending transcript"
        );

        let reply = self.backend.complete(&window, &self.params).await?;

        self.transcript.push(Message::assistant(reply.as_str()));
        info!(turns = self.transcript.len(), "reply recorded");
        Ok(reply)
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Everything but the system message.
    pub fn display_transcript(&self) -> Vec<Message> {
        self.transcript
            .iter()
            .filter(|m| m.role() != Role::System)
            .cloned()
            .collect()
    }

    /// The messages the next request would carry: the system message, then
    /// the newest turns up to the history limit.
    pub fn request_window(&self) -> Vec<Message> {
        let (system, turns) = self.transcript.split_at(1);
        let skip = match self.history_limit {
            Some(limit) => turns.len().saturating_sub(limit),
            None => 0,
        };
        system.iter().chain(&turns[skip..]).cloned().collect()
    }

    pub fn params(&self) -> &CompletionParams {
        &self.params
    }
}

/// Size of the JSON body the messages serialize to.
pub fn payload_size(messages: &[Message]) -> usize {
    serde_json::to_vec(messages).map(|v| v.len()).unwrap_or(0)
}

/// Everything needed to start a fresh session.
#[derive(Clone)]
pub struct SessionTemplate {
    pub backend: Arc<dyn CompletionBackend>,
    pub persona: Persona,
    pub params: CompletionParams,
    pub history_limit: Option<usize>,
}

impl SessionTemplate {
    pub fn new(backend: Arc<dyn CompletionBackend>, persona: Persona) -> SessionTemplate {
        SessionTemplate {
            backend,
            persona,
            params: CompletionParams::default(),
            history_limit: None,
        }
    }

    pub fn spawn(&self) -> Session {
        Session::new(self.backend.clone(), &self.persona)
            .with_params(self.params.clone())
            .with_history_limit(self.history_limit)
    }
}
