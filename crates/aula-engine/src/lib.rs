//! # aula-engine
//!
//! The public question-answering pipeline. One call to [`AnswerEngine::answer`]
//! resolves the session, contextualizes the query, retrieves hybrid evidence,
//! drafts an answer, verifies it, and returns either a cited answer or an
//! abstention with contacts. It never returns an error.

pub mod engine;
pub mod format;
pub mod outcome;

pub use engine::{AnswerEngine, Collaborators};
pub use outcome::AnswerOutcome;
