//! SessionManager: concurrent per-session conversation memory via DashMap.
//!
//! Guards on the map are never held across an `.await`: folding a turn into
//! the summary peeks the window under the guard, calls the summarizer with no
//! guard held, then re-acquires the guard to apply the result.

use std::sync::Arc;

use aula_core::config::MemoryConfig;
use aula_core::constants::MAX_SESSION_ID_LEN;
use aula_core::errors::SessionError;
use aula_core::models::{ChatHistory, DegradationEvent, Turn};
use aula_core::traits::ITextGenerator;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::anaphora;
use crate::state::ConversationState;
use crate::summary::{self, Fragment};
use crate::topics;

/// A session id ready for use. `replaced` holds the reason a malformed id
/// was swapped for a fresh one.
#[derive(Debug)]
pub struct ResolvedSession {
    pub id: String,
    pub replaced: Option<SessionError>,
}

impl ResolvedSession {
    pub fn is_fresh(&self) -> bool {
        self.replaced.is_some()
    }
}

/// A query after context resolution. `original` is always the caller's text.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextualizedQuery {
    pub original: String,
    pub rewritten: String,
    /// Topic substituted into the query, when a rewrite happened.
    pub topic: Option<String>,
}

impl ContextualizedQuery {
    fn unchanged(query: &str) -> Self {
        Self {
            original: query.to_string(),
            rewritten: query.to_string(),
            topic: None,
        }
    }

    pub fn was_rewritten(&self) -> bool {
        self.topic.is_some()
    }
}

/// What `record_turn` did to the session.
#[derive(Debug, Clone, Default)]
pub struct TurnRecord {
    /// Turns folded out of the window into the summary.
    pub folded: usize,
    pub summary_version: u64,
    /// Set when the summarizer failed and the heuristic summary was used.
    pub degradation: Option<DegradationEvent>,
}

/// Check a caller-supplied session id.
pub fn validate_session_id(raw: &str) -> Result<(), SessionError> {
    let reason = if raw.trim().is_empty() {
        "empty session id".to_string()
    } else if raw.chars().count() > MAX_SESSION_ID_LEN {
        format!("longer than {MAX_SESSION_ID_LEN} characters")
    } else if raw.chars().any(char::is_control) {
        "contains control characters".to_string()
    } else {
        return Ok(());
    };
    Err(SessionError::MalformedSession { reason })
}

/// Thread-safe conversation memory keyed by session id.
pub struct SessionManager {
    sessions: Arc<DashMap<String, ConversationState>>,
    summarizer: Option<Arc<dyn ITextGenerator>>,
    config: MemoryConfig,
}

impl SessionManager {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            summarizer: None,
            config,
        }
    }

    /// Use `summarizer` to fold old turns. Without one, summaries are heuristic.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn ITextGenerator>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    /// Accept `raw` as a session id, or mint a fresh one when it is malformed.
    pub fn resolve_id(&self, raw: &str) -> ResolvedSession {
        match validate_session_id(raw) {
            Ok(()) => ResolvedSession {
                id: raw.to_string(),
                replaced: None,
            },
            Err(e) => {
                let id = uuid::Uuid::new_v4().to_string();
                warn!(
                    error = %e,
                    fresh_session = %id,
                    "malformed session id, starting a fresh session"
                );
                ResolvedSession {
                    id,
                    replaced: Some(e),
                }
            }
        }
    }

    /// Rewrite an anaphoric query into a self-contained one using the most
    /// recently discussed topic.
    ///
    /// Unknown sessions, empty history, queries without anaphora, and queries
    /// that already name the topic come back verbatim, so applying this twice
    /// is the same as applying it once.
    pub fn contextualize(&self, session_id: &str, query: &str) -> ContextualizedQuery {
        let topic = match self.sessions.get(session_id) {
            Some(state) if state.has_history() => state.current_topic().map(str::to_string),
            _ => None,
        };
        let Some(topic) = topic else {
            return ContextualizedQuery::unchanged(query);
        };
        if !anaphora::has_anaphora(query) || topics::mentions(query, &topic) {
            return ContextualizedQuery::unchanged(query);
        }

        let rewritten = anaphora::resolve(query, &topic);
        debug!(session_id, %topic, "query contextualized");
        ContextualizedQuery {
            original: query.to_string(),
            rewritten,
            topic: Some(topic),
        }
    }

    /// Track the topics mentioned in `content`. Returns the ones found.
    pub fn track_topics(&self, session_id: &str, content: &str) -> Vec<String> {
        let found = topics::extract(content);
        if found.is_empty() {
            return Vec::new();
        }
        let mut state = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationState::new(session_id));
        for topic in &found {
            state.touch_topic(topic);
        }
        found.into_iter().map(str::to_string).collect()
    }

    /// Append a completed turn, folding the oldest turns into the summary once
    /// the window overflows.
    ///
    /// Dropping the future before it completes leaves the session untouched.
    /// Concurrent calls on one session apply in completion order; a fold whose
    /// peeked turn was already taken by another call uses the heuristic summary.
    pub async fn record_turn(&self, session_id: &str, query: &str, answer: &str) -> TurnRecord {
        let turn = Turn::new(query, answer);
        let window = self.config.window_size.max(1);

        let candidate = self.sessions.get(session_id).and_then(|state| {
            (state.turns.len() + 1 > window)
                .then(|| state.turns.front().cloned())
                .flatten()
        });

        let mut degradation = None;
        let mut pending = match candidate {
            Some(oldest) => {
                let (fragment, event) = self.summarize(&oldest).await;
                degradation = event;
                Some((oldest, fragment))
            }
            None => None,
        };

        let mut state = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| ConversationState::new(session_id));
        state.turns.push_back(turn);

        let mut folded = 0;
        while state.turns.len() > window {
            let Some(oldest) = state.turns.pop_front() else {
                break;
            };
            let fragment = match pending.take() {
                Some((peeked, fragment)) if peeked == oldest => fragment,
                other => {
                    pending = other;
                    Fragment::heuristic(&oldest)
                }
            };
            let merged = summary::merge(&state.summary, &fragment, self.config.max_summary_chars);
            state.summary = merged;
            state.summary_version += 1;
            folded += 1;
        }

        // Answer topics first so the query's own topics end up most recent.
        for topic in topics::extract(answer).into_iter().chain(topics::extract(query)) {
            state.touch_topic(topic);
        }
        state.touch();

        if folded > 0 {
            debug!(
                session_id,
                folded,
                summary_version = state.summary_version,
                "turns folded into summary"
            );
        }
        TurnRecord {
            folded,
            summary_version: state.summary_version,
            degradation,
        }
    }

    async fn summarize(&self, turn: &Turn) -> (Fragment, Option<DegradationEvent>) {
        let Some(summarizer) = &self.summarizer else {
            return (Fragment::heuristic(turn), None);
        };
        match summarizer
            .generate(&summary::prompt(turn), self.config.summary_max_tokens)
            .await
        {
            Ok(text) => (Fragment::generated_or_heuristic(&text, turn), None),
            Err(e) => {
                let error = SessionError::SummarizationFailed {
                    reason: e.to_string(),
                };
                warn!(
                    summarizer = summarizer.name(),
                    error = %error,
                    "falling back to heuristic summary"
                );
                let event =
                    DegradationEvent::new("summarizer", error.to_string(), "heuristic_summary");
                (Fragment::heuristic(turn), Some(event))
            }
        }
    }

    /// Summary plus the recent window, for the answer synthesizer.
    pub fn history(&self, session_id: &str) -> ChatHistory {
        self.sessions
            .get(session_id)
            .map(|s| s.history())
            .unwrap_or_default()
    }

    /// Tracked topics, most recent last.
    pub fn topics(&self, session_id: &str) -> Vec<String> {
        self.sessions
            .get(session_id)
            .map(|s| s.topics.clone())
            .unwrap_or_default()
    }

    /// Snapshot of a session's state.
    pub fn get(&self, session_id: &str) -> Option<ConversationState> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// Drop a session. Returns whether it existed.
    pub fn reset(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Remove sessions idle for longer than `max_idle`. Returns how many were removed.
    pub fn cleanup_idle_sessions(&self, max_idle: chrono::Duration) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, state| state.idle_for(now) <= max_idle);
        let removed = before.saturating_sub(self.sessions.len());
        if removed > 0 {
            debug!(removed, "idle sessions cleaned up");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}
