pub mod client;
pub mod config;
pub mod error;
pub mod reply;
pub mod session;
pub mod state;

// Re-export main types for convenience
pub use client::{AskClient, AskResponse};
pub use config::{Config, ConfigFile, DEFAULT_API_URL};
pub use error::{AskError, ConfigError, SubmitError};
pub use reply::Reply;
pub use session::{ChatSession, PendingAsk};
pub use state::{ChatMessage, ChatRole, Transcript};
