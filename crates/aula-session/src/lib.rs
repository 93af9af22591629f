//! # aula-session
//!
//! Per-session conversation memory: a sliding window of turns, a running
//! summary fed by the oldest turns, tracked topics, and anaphora rewriting
//! into self-contained queries.

pub mod anaphora;
pub mod manager;
pub mod state;
pub mod summary;
pub mod topics;

pub use manager::{ContextualizedQuery, ResolvedSession, SessionManager, TurnRecord};
pub use state::ConversationState;
