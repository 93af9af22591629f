use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chunk::ChunkId;
use super::degradation_event::DegradationEvent;

/// Verification layers, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLayer {
    EmbeddingFaithfulness,
    EntailmentFaithfulness,
    HeuristicVerification,
    CrossReference,
    ConfidenceGate,
    FallbackSuggestion,
    CitationEnforcement,
}

impl VerificationLayer {
    pub const ORDER: [VerificationLayer; 7] = [
        Self::EmbeddingFaithfulness,
        Self::EntailmentFaithfulness,
        Self::HeuristicVerification,
        Self::CrossReference,
        Self::ConfidenceGate,
        Self::FallbackSuggestion,
        Self::CitationEnforcement,
    ];

    /// Abstention reason reported when this layer is the first to fail.
    pub fn failure_reason(self) -> Option<AbstentionReason> {
        match self {
            Self::EmbeddingFaithfulness => Some(AbstentionReason::LowFaithfulness),
            Self::EntailmentFaithfulness => Some(AbstentionReason::EntailmentFailed),
            Self::HeuristicVerification => Some(AbstentionReason::UnverifiedFacts),
            Self::CrossReference => Some(AbstentionReason::Contradiction),
            Self::ConfidenceGate => Some(AbstentionReason::LowConfidence),
            Self::FallbackSuggestion => None,
            Self::CitationEnforcement => Some(AbstentionReason::UncitedSentence),
        }
    }
}

/// Outcome of a single verification layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub layer: VerificationLayer,
    pub passed: bool,
    /// Layer score in [0, 1].
    pub signal: f64,
    pub detail: String,
}

impl CheckResult {
    pub fn new(
        layer: VerificationLayer,
        passed: bool,
        signal: f64,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            layer,
            passed,
            signal: signal.clamp(0.0, 1.0),
            detail: detail.into(),
        }
    }
}

/// Faithfulness scores of one claim of the draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimScore {
    pub claim: String,
    /// Max cosine similarity against evidence sentences.
    pub similarity: f64,
    /// Max entailment probability against evidence chunks; `None` when the scorer failed.
    pub entailment: Option<f64>,
}

/// A disagreement between vector- and graph-sourced evidence about the same subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub subject: String,
    pub attribute: String,
    pub vector_value: String,
    pub graph_value: String,
    pub vector_chunk: ChunkId,
    pub graph_chunk: ChunkId,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} ({}) vs {} ({})",
            self.subject,
            self.attribute,
            self.vector_value,
            self.vector_chunk,
            self.graph_value,
            self.graph_chunk
        )
    }
}

/// Machine-readable abstention codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstentionReason {
    NoEvidence,
    OutOfDomain,
    LowFaithfulness,
    EntailmentFailed,
    UnverifiedFacts,
    Contradiction,
    LowConfidence,
    UncitedSentence,
    SynthesisFailed,
    Timeout,
}

impl AbstentionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoEvidence => "no_evidence",
            Self::OutOfDomain => "out_of_domain",
            Self::LowFaithfulness => "low_faithfulness",
            Self::EntailmentFailed => "entailment_failed",
            Self::UnverifiedFacts => "unverified_facts",
            Self::Contradiction => "contradiction",
            Self::LowConfidence => "low_confidence",
            Self::UncitedSentence => "uncited_sentence",
            Self::SynthesisFailed => "synthesis_failed",
            Self::Timeout => "timeout",
        }
    }
}

impl fmt::Display for AbstentionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict lifecycle: `Pending → {Approved | Abstained}`, terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Pending,
    Approved,
    Abstained,
}

impl VerdictStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Approved => f.write_str("approved"),
            Self::Abstained => f.write_str("abstained"),
        }
    }
}

/// A source reference attached to an approved answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based marker as it appears in the answer text (`[n]`).
    pub marker: usize,
    pub chunk_id: ChunkId,
    pub document_id: String,
    pub section: String,
}

/// The single verdict produced for a query. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationVerdict {
    pub id: Uuid,
    pub status: VerdictStatus,
    pub approved: bool,
    pub claim_scores: Vec<ClaimScore>,
    pub conflict_count: usize,
    pub conflicts: Vec<Conflict>,
    pub confidence: f64,
    pub reason: Option<AbstentionReason>,
    /// Every layer's result, in evaluation order.
    pub checks: Vec<CheckResult>,
    pub contacts: Vec<String>,
    pub citations: Vec<Citation>,
    pub diagnostics: Vec<DegradationEvent>,
    pub created_at: DateTime<Utc>,
}

impl VerificationVerdict {
    pub fn check(&self, layer: VerificationLayer) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.layer == layer)
    }
}
