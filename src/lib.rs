pub mod config;
pub mod conversation;
mod error;
pub mod frontend;
pub mod terminal;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
pub use frontend::start_server;
