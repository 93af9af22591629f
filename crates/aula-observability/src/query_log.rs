//! Per-query audit log: query, rewrite, query type, latency, evidence count,
//! outcome, and the verdict id for tracing an answer back to its checks.

use std::collections::VecDeque;
use std::time::Duration;

use aula_core::models::{AbstentionReason, ResponseStatus};
use aula_core::QueryType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single query log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query: String,
    /// Set when contextualization rewrote the query.
    pub rewritten_query: Option<String>,
    pub query_type: QueryType,
    pub latency: Duration,
    pub evidence_count: usize,
    pub status: ResponseStatus,
    pub reason: Option<AbstentionReason>,
    pub verdict_id: Uuid,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Create a new entry with the timestamp set to now.
    pub fn new(
        query: impl Into<String>,
        query_type: QueryType,
        latency: Duration,
        evidence_count: usize,
        status: ResponseStatus,
        verdict_id: Uuid,
    ) -> Self {
        Self {
            query: query.into(),
            rewritten_query: None,
            query_type,
            latency,
            evidence_count,
            status,
            reason: None,
            verdict_id,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_rewrite(mut self, rewritten: impl Into<String>) -> Self {
        self.rewritten_query = Some(rewritten.into());
        self
    }

    pub fn with_reason(mut self, reason: Option<AbstentionReason>) -> Self {
        self.reason = reason;
        self
    }
}

/// Bounded query log. The oldest entries are dropped first.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::with_capacity(aula_core::config::defaults::DEFAULT_QUERY_LOG_CAPACITY)
    }

    /// Create with a custom capacity (at least one entry).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a query.
    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query = %entry.query,
            query_type = %entry.query_type,
            latency_ms = entry.latency.as_millis() as u64,
            evidence_count = entry.evidence_count,
            reason = entry.reason.map(|r| r.as_str()).unwrap_or("none"),
            verdict_id = %entry.verdict_id,
            "query logged"
        );

        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// All retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    pub fn find(&self, verdict_id: Uuid) -> Option<&QueryLogEntry> {
        self.entries.iter().find(|e| e.verdict_id == verdict_id)
    }

    /// Average latency across all logged queries.
    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0 to 1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let p = p.clamp(0.0, 1.0);
        let idx = ((p * (latencies.len() - 1) as f64).round() as usize).min(latencies.len() - 1);
        latencies[idx]
    }

    /// Share of logged queries that abstained.
    pub fn abstention_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let abstained = self
            .entries
            .iter()
            .filter(|e| e.status == ResponseStatus::Abstained)
            .count();
        abstained as f64 / self.entries.len() as f64
    }

    /// Abstentions for `reason`.
    pub fn count_reason(&self, reason: AbstentionReason) -> usize {
        self.entries.iter().filter(|e| e.reason == Some(reason)).count()
    }

    /// Total number of retained queries.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Entries as JSON lines, for export.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&serde_json::to_string(entry)?);
            out.push('\n');
        }
        Ok(out)
    }
}
