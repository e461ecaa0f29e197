mod api;
mod app;
mod components;
mod markdown;
mod server_liveview;
mod types;

use crate::conversation::SessionRegistry;

pub use server_liveview::{router, start_server};
pub use types::{ChatLine, LineKind};

/// Shared by every route of the web server.
pub struct ServerState {
    pub registry: SessionRegistry,
    /// `host:port` browsers use to reach the liveview socket.
    pub reachable_addr: String,
}
