//! ConversationState: the turn window, running summary, and topics of one session.

use std::collections::VecDeque;

use aula_core::models::{ChatHistory, Turn};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-session conversation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    pub session_id: String,
    /// Recent turns, oldest first. Never longer than the configured window.
    pub turns: VecDeque<Turn>,
    /// Running summary of every turn that left the window.
    pub summary: String,
    /// Bumped each time a turn is folded into `summary`.
    pub summary_version: u64,
    /// Tracked topic labels, most recently mentioned last.
    pub topics: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            turns: VecDeque::new(),
            summary: String::new(),
            summary_version: 0,
            topics: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// No turn was ever recorded or summarized.
    pub fn has_history(&self) -> bool {
        !self.turns.is_empty() || !self.summary.is_empty()
    }

    /// The most recently mentioned topic.
    pub fn current_topic(&self) -> Option<&str> {
        self.topics.last().map(String::as_str)
    }

    /// Mark `topic` as the most recent one.
    pub fn touch_topic(&mut self, topic: &str) {
        self.topics.retain(|t| t != topic);
        self.topics.push(topic.to_string());
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    pub fn idle_for(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.last_activity
    }

    pub fn history(&self) -> ChatHistory {
        ChatHistory {
            summary: self.summary.clone(),
            turns: self.turns.iter().cloned().collect(),
        }
    }
}
