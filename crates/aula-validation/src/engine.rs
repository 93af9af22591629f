//! The anti-hallucination engine: runs every layer against a draft and
//! settles a single verdict.

use std::sync::Arc;

use aula_core::config::VerificationConfig;
use aula_core::models::{
    AbstentionReason, CheckResult, ClaimScore, FusedEvidence, VerificationLayer,
    VerificationVerdict,
};
use aula_core::traits::{IContactDirectory, IEmbeddingProvider, INliScorer};
use aula_core::QueryType;
use tracing::{debug, warn};

use crate::claims;
use crate::contacts::{self, ContactTable};
use crate::layers::{citation, confidence, cross_reference, embedding, entailment, heuristic};
use crate::verdict::VerdictBuilder;

/// Retrieval signal when no vector hit contributed a score.
const NEUTRAL_RETRIEVAL_SIGNAL: f64 = 0.5;

pub struct AntiHallucinationEngine {
    embedder: Arc<dyn IEmbeddingProvider>,
    nli: Arc<dyn INliScorer>,
    directory: Arc<dyn IContactDirectory>,
    config: VerificationConfig,
}

impl AntiHallucinationEngine {
    pub fn new(
        embedder: Arc<dyn IEmbeddingProvider>,
        nli: Arc<dyn INliScorer>,
        directory: Arc<dyn IContactDirectory>,
        config: VerificationConfig,
    ) -> Self {
        Self {
            embedder,
            nli,
            directory,
            config,
        }
    }

    /// Route contacts through the configured table.
    pub fn with_contact_table(
        embedder: Arc<dyn IEmbeddingProvider>,
        nli: Arc<dyn INliScorer>,
        config: VerificationConfig,
    ) -> Self {
        let directory = Arc::new(ContactTable::from_config(&config));
        Self::new(embedder, nli, directory, config)
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    /// Ranked contacts for `query`, never empty.
    pub fn suggest_contacts(&self, query: &str, evidence: &FusedEvidence) -> Vec<String> {
        contacts::suggest(
            query,
            evidence,
            self.directory.as_ref(),
            self.config.max_contacts,
        )
    }

    fn fallback_check(contacts: &[String]) -> CheckResult {
        CheckResult::new(
            VerificationLayer::FallbackSuggestion,
            true,
            1.0,
            format!("{} contacts ranked", contacts.len()),
        )
    }

    /// Abstain before any draft exists (no evidence, failed synthesis,
    /// elapsed deadline). Only the fallback layer runs.
    pub fn abstain_without_draft(
        &self,
        query: &str,
        evidence: &FusedEvidence,
        reason: AbstentionReason,
    ) -> VerificationVerdict {
        let contacts = self.suggest_contacts(query, evidence);
        let mut builder = VerdictBuilder::new();
        builder.record(Self::fallback_check(&contacts)).contacts(contacts);
        let verdict = builder.abstain(reason);
        debug!(verdict = %verdict.id, reason = %reason, "abstained without draft");
        verdict
    }

    /// Run all seven layers over `draft` and settle the verdict.
    ///
    /// Reason precedence: `no_evidence`, then `out_of_domain`, then
    /// `contradiction`, then the first failing layer in evaluation order.
    pub async fn verify(
        &self,
        query: &str,
        draft: &str,
        evidence: &FusedEvidence,
        query_type: QueryType,
    ) -> VerificationVerdict {
        let cfg = &self.config;
        let claims = claims::segment(draft, cfg.min_claim_chars);

        let (embedded, entailed) = futures::join!(
            embedding::check(
                self.embedder.as_ref(),
                &claims,
                evidence,
                cfg.faithfulness_threshold
            ),
            entailment::check(self.nli.as_ref(), &claims, evidence, cfg.entailment_threshold),
        );
        let heuristic = heuristic::check(draft, evidence);
        let (cross, conflicts) = cross_reference::check(evidence, cfg.cross_reference_neutral);
        if !conflicts.is_empty() {
            warn!(conflicts = conflicts.len(), "evidence sources disagree");
        }

        let signals = confidence::Signals {
            embedding: embedded.check.signal,
            entailment: entailed.check.signal,
            heuristic: heuristic.signal,
            cross_reference: cross.signal,
            retrieval: evidence
                .best_vector_score()
                .unwrap_or(NEUTRAL_RETRIEVAL_SIGNAL)
                .clamp(0.0, 1.0),
        };
        let gate = confidence::check(&signals, &cfg.confidence_weights, cfg.abstention_threshold);
        let contacts = self.suggest_contacts(query, evidence);
        let (citation, citations) = citation::check(&claims::sentences(draft), evidence);

        let claim_scores = claims
            .iter()
            .enumerate()
            .map(|(i, claim)| ClaimScore {
                claim: claim.text.clone(),
                similarity: embedded.similarities.get(i).copied().unwrap_or(0.0),
                entailment: entailed.scores.get(i).copied().flatten(),
            })
            .collect();

        let mut builder = VerdictBuilder::new();
        builder
            .record(embedded.check)
            .record(entailed.check)
            .record(heuristic)
            .record(cross.clone())
            .record(gate.clone())
            .record(Self::fallback_check(&contacts))
            .record(citation)
            .claim_scores(claim_scores)
            .conflicts(conflicts)
            .confidence(gate.signal)
            .citations(citations);
        for event in embedded.degradation.into_iter().chain(entailed.degradation) {
            builder.diagnostic(event);
        }

        let reason = if evidence.is_empty() {
            Some(AbstentionReason::NoEvidence)
        } else if query_type == QueryType::OutOfDomain {
            Some(AbstentionReason::OutOfDomain)
        } else if !cross.passed {
            Some(AbstentionReason::Contradiction)
        } else {
            builder.first_failure()
        };

        let verdict = match reason {
            None => builder.approve(),
            Some(reason) => {
                builder.contacts(contacts);
                builder.abstain(reason)
            }
        };
        debug!(
            verdict = %verdict.id,
            status = %verdict.status,
            confidence = verdict.confidence,
            claims = verdict.claim_scores.len(),
            conflicts = verdict.conflict_count,
            "verification settled"
        );
        verdict
    }
}
