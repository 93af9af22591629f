use std::time::Duration;

use aula_core::models::{
    AbstentionReason, AnswerResponse, DegradationEvent, FusedEvidence, ResponseStatus,
    VerificationVerdict,
};
use aula_core::QueryType;
use aula_session::TurnRecord;

/// Everything one `answer` call produced, for callers that need more than the
/// public response shape.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub response: AnswerResponse,
    pub verdict: VerificationVerdict,
    /// The session the turn belongs to; differs from the caller's id when
    /// that id was malformed.
    pub session_id: String,
    pub fresh_session: bool,
    /// Set when contextualization rewrote the query.
    pub rewritten_query: Option<String>,
    pub query_type: QueryType,
    pub evidence: FusedEvidence,
    /// The synthesizer's draft, when one was produced.
    pub draft: Option<String>,
    /// `None` when the call was cut short and no turn was recorded.
    pub turn: Option<TurnRecord>,
    pub latency: Duration,
}

impl AnswerOutcome {
    pub fn status(&self) -> ResponseStatus {
        self.response.status
    }

    pub fn reason(&self) -> Option<AbstentionReason> {
        self.verdict.reason
    }

    pub fn diagnostics(&self) -> &[DegradationEvent] {
        &self.verdict.diagnostics
    }

    /// Whether any diagnostic came from `component`.
    pub fn degraded(&self, component: &str) -> bool {
        self.verdict.diagnostics.iter().any(|d| d.component == component)
    }
}
