use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub query: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Running summary plus the recent window, as handed to the answer synthesizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHistory {
    pub summary: String,
    pub turns: Vec<Turn>,
}

impl ChatHistory {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.turns.is_empty()
    }

    /// Plain-text rendering for prompts.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.summary.is_empty() {
            out.push_str("Resumen de la conversación previa: ");
            out.push_str(&self.summary);
            out.push('\n');
        }
        for turn in &self.turns {
            out.push_str("Usuario: ");
            out.push_str(&turn.query);
            out.push_str("\nAsistente: ");
            out.push_str(&turn.answer);
            out.push('\n');
        }
        out
    }
}
