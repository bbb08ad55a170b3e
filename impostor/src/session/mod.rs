//! Session module: the orchestration driver around the game state machine.
//!
//! This module implements:
//! - SessionActor: async actor owning the current snapshot and applying
//!   every transition in order
//! - SessionHandle: cloneable handle for submitting human input and reading
//!   state
//! - Generator round-trips with a bounded timeout and local fallbacks
//! - Stale-response discard by game generation
//!
//! ## Example
//!
//! ```no_run
//! use impostor::bot::LocalBot;
//! use impostor::game::words::WordList;
//! use impostor::session::{SessionActor, SessionConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, handle) = SessionActor::new(
//!         SessionConfig::default(),
//!         Arc::new(LocalBot::default()),
//!         Arc::new(WordList),
//!     )
//!     .unwrap();
//!     tokio::spawn(actor.run());
//!
//!     let state = handle.new_game().await.unwrap();
//!     println!("{} players, round {}", state.participants.len(), state.current_round);
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod messages;

pub use actor::{SessionActor, SessionHandle};
pub use config::SessionConfig;
pub use errors::{SessionError, SessionResult};
pub use messages::{SessionMessage, SessionNotification};
