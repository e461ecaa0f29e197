mod backend;
mod persona;
mod registry;
mod session;
mod types;

pub use backend::{CompletionBackend, CompletionParams, OpenAiBackend};
pub use persona::{Persona, Surface, BOT_NAME, FAREWELL, GREETING, KICKOFF_PROMPT};
pub use registry::{SessionHandle, SessionId, SessionRegistry, SessionState, DEFAULT_MAX_SESSIONS};
pub use session::{payload_size, Session, SessionTemplate};
pub use types::{Message, Role};

#[cfg(test)]
pub(crate) use backend::scripted::ScriptedBackend;
