//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

use aula_core::models::{Conflict, DegradationEvent, VerificationVerdict};

/// Log the outcome of hybrid fusion.
pub fn evidence_fused(vector_hits: usize, graph_hits: usize, fused: usize) {
    tracing::info!(
        event = "evidence_fused",
        vector_hits = vector_hits,
        graph_hits = graph_hits,
        fused = fused,
        "evidence fused"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(event: &DegradationEvent) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %event.component,
        failure = %event.failure,
        fallback = %event.fallback_used,
        "degradation triggered"
    );
}

/// Log conflicting evidence. Warn level: these need a maintainer to fix the corpus.
pub fn contradiction_detected(query: &str, conflicts: &[Conflict]) {
    let details: Vec<String> = conflicts.iter().map(ToString::to_string).collect();
    tracing::warn!(
        event = "contradiction_detected",
        query = %query,
        conflict_count = conflicts.len(),
        conflicts = ?details,
        needs_review = true,
        "contradiction detected"
    );
}

/// Log an abstention.
pub fn abstained(verdict: &VerificationVerdict) {
    tracing::info!(
        event = "abstained",
        verdict_id = %verdict.id,
        reason = verdict.reason.map(|r| r.as_str()).unwrap_or("unknown"),
        confidence = verdict.confidence,
        contacts = verdict.contacts.len(),
        "answer abstained"
    );
}

/// Log an approval.
pub fn approved(verdict: &VerificationVerdict) {
    tracing::info!(
        event = "approved",
        verdict_id = %verdict.id,
        confidence = verdict.confidence,
        citations = verdict.citations.len(),
        "answer approved"
    );
}

/// Emit `approved` or `abstained` for a settled verdict.
pub fn verdict_settled(verdict: &VerificationVerdict) {
    if verdict.approved {
        approved(verdict);
    } else {
        abstained(verdict);
    }
}

/// Log a turn folded out of the window into the summary.
pub fn session_folded(session_id: &str, summary_version: u64) {
    tracing::debug!(
        event = "session_folded",
        session_id = %session_id,
        summary_version = summary_version,
        "turn folded into summary"
    );
}
