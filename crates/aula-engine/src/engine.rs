//! AnswerEngine: owns the retrieval, session, and verification engines and
//! runs one query end to end.
//!
//! session → contextualize → hybrid retrieval → draft → verify → format →
//! record turn → audit log.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use aula_core::config::AulaConfig;
use aula_core::errors::{AulaError, AulaResult};
use aula_core::models::{
    AbstentionReason, AnswerResponse, DegradationEvent, FusedEvidence, VerificationVerdict,
};
use aula_core::traits::{
    IAnswerSynthesizer, IContactDirectory, IEmbeddingProvider, INliScorer, ITextGenerator,
};
use aula_core::QueryType;
use aula_embeddings::EmbeddingEngine;
use aula_observability::tracing_setup::events;
use aula_observability::{answer_span, retrieval_span, verification_span, QueryLog, QueryLogEntry};
use aula_retrieval::expansion::QueryEnhancer;
use aula_retrieval::fusion::classify;
use aula_retrieval::{CorpusSnapshot, HybridRetrieval, HybridRetriever};
use aula_session::{ResolvedSession, SessionManager};
use aula_validation::{AntiHallucinationEngine, ContactTable};
use tracing::{debug, info, warn, Instrument};

use crate::format;
use crate::outcome::AnswerOutcome;

/// The external services the engine consumes.
pub struct Collaborators {
    pub embedder: Arc<dyn IEmbeddingProvider>,
    /// HyDE, paraphrases, and session summaries. Optional: each degrades.
    pub generator: Option<Arc<dyn ITextGenerator>>,
    pub nli: Arc<dyn INliScorer>,
    pub synthesizer: Arc<dyn IAnswerSynthesizer>,
    /// Defaults to the configured contact table.
    pub contacts: Option<Arc<dyn IContactDirectory>>,
}

pub struct AnswerEngine {
    corpus: RwLock<Arc<CorpusSnapshot>>,
    embeddings: Arc<EmbeddingEngine>,
    retriever: HybridRetriever,
    synthesizer: Arc<dyn IAnswerSynthesizer>,
    verifier: AntiHallucinationEngine,
    sessions: SessionManager,
    query_log: Mutex<QueryLog>,
    config: AulaConfig,
}

/// A pipeline run before it is logged.
struct Settled {
    verdict: VerificationVerdict,
    rewritten_query: Option<String>,
    query_type: QueryType,
    evidence: FusedEvidence,
    draft: Option<String>,
}

impl AnswerEngine {
    pub fn new(
        collaborators: Collaborators,
        corpus: CorpusSnapshot,
        config: AulaConfig,
    ) -> AulaResult<Self> {
        config.validate()?;
        let Collaborators {
            embedder,
            generator,
            nli,
            synthesizer,
            contacts,
        } = collaborators;

        let embeddings = Arc::new(EmbeddingEngine::with_provider(
            embedder,
            config.embedding.clone(),
        ));
        let shared_embedder: Arc<dyn IEmbeddingProvider> = embeddings.clone();

        let enhancer = QueryEnhancer::new(
            Arc::clone(&shared_embedder),
            generator.clone(),
            config.expansion.clone(),
        );
        let retriever = HybridRetriever::new(Arc::new(enhancer), &config);

        let directory: Arc<dyn IContactDirectory> = match contacts {
            Some(directory) => directory,
            None => Arc::new(ContactTable::from_config(&config.verification)),
        };
        let verifier = AntiHallucinationEngine::new(
            shared_embedder,
            nli,
            directory,
            config.verification.clone(),
        );

        let mut sessions = SessionManager::new(config.memory.clone());
        if let Some(generator) = generator {
            sessions = sessions.with_summarizer(generator);
        }

        info!(
            embedder = embeddings.active_provider(),
            mode = ?config.retrieval.mode,
            "AnswerEngine initialized"
        );

        Ok(Self {
            corpus: RwLock::new(Arc::new(corpus)),
            embeddings,
            retriever,
            synthesizer,
            verifier,
            sessions,
            query_log: Mutex::new(QueryLog::with_capacity(config.observability.query_log_capacity)),
            config,
        })
    }

    pub fn config(&self) -> &AulaConfig {
        &self.config
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// A copy of the audit log.
    pub fn query_log(&self) -> QueryLog {
        self.query_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the corpus. Queries already running keep the snapshot they started with.
    pub fn swap_corpus(&self, corpus: CorpusSnapshot) {
        let mut current = self.corpus.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(corpus);
        info!("corpus snapshot swapped");
    }

    pub fn reset_session(&self, session_id: &str) -> bool {
        self.sessions.reset(session_id)
    }

    fn snapshot(&self) -> Arc<CorpusSnapshot> {
        Arc::clone(&self.corpus.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Answer `query` in `session_id`. Never fails: every failure is an abstention.
    pub async fn answer(&self, query: &str, session_id: &str) -> AnswerResponse {
        self.answer_detailed(query, session_id).await.response
    }

    pub async fn answer_detailed(&self, query: &str, session_id: &str) -> AnswerOutcome {
        let started = Instant::now();
        let session = self.sessions.resolve_id(session_id);
        let span = answer_span!(session.id);
        async {
            let settled = self.run(query, &session.id).await;
            self.complete(query, &session, settled, started).await
        }
        .instrument(span)
        .await
    }

    /// Like [`answer_detailed`](Self::answer_detailed), abstaining with
    /// `timeout` once `deadline` elapses. A cut-short call records no turn.
    pub async fn answer_with_deadline(
        &self,
        query: &str,
        session_id: &str,
        deadline: Duration,
    ) -> AnswerOutcome {
        let started = Instant::now();
        let session = self.sessions.resolve_id(session_id);
        let span = answer_span!(session.id);
        let run = async {
            let settled = self.run(query, &session.id).await;
            self.complete(query, &session, settled, started).await
        };
        let finished = tokio::time::timeout(deadline, run.instrument(span)).await;
        match finished {
            Ok(outcome) => outcome,
            Err(_) => self.timed_out(query, &session, deadline, started),
        }
    }

    async fn run(&self, query: &str, session_id: &str) -> Settled {
        let contextualized = self.sessions.contextualize(session_id, query);
        let effective = contextualized.rewritten.clone();
        let rewritten_query = contextualized.was_rewritten().then(|| effective.clone());
        let corpus = self.snapshot();

        let mut diagnostics = Vec::new();
        let retrieval = self.retrieve(&corpus, &effective, &mut diagnostics).await;
        let HybridRetrieval {
            evidence,
            query_type,
            ..
        } = retrieval;

        let early = if evidence.is_empty() {
            Some(AbstentionReason::NoEvidence)
        } else if query_type == QueryType::OutOfDomain {
            Some(AbstentionReason::OutOfDomain)
        } else {
            None
        };
        if let Some(reason) = early {
            let mut verdict = self.verifier.abstain_without_draft(query, &evidence, reason);
            self.attach_diagnostics(&mut verdict, diagnostics);
            return Settled {
                verdict,
                rewritten_query,
                query_type,
                evidence,
                draft: None,
            };
        }

        let history = self.sessions.history(session_id);
        let draft = match self.synthesizer.draft(&effective, &evidence, &history).await {
            Ok(draft) => draft,
            Err(e) => {
                warn!(error = %e, "answer synthesis failed");
                diagnostics.push(DegradationEvent::new("synthesizer", e.to_string(), "abstention"));
                let mut verdict = self.verifier.abstain_without_draft(
                    query,
                    &evidence,
                    AbstentionReason::SynthesisFailed,
                );
                self.attach_diagnostics(&mut verdict, diagnostics);
                return Settled {
                    verdict,
                    rewritten_query,
                    query_type,
                    evidence,
                    draft: None,
                };
            }
        };

        let mut verdict = self
            .verifier
            .verify(&effective, &draft, &evidence, query_type)
            .instrument(verification_span!(evidence.len()))
            .await;
        self.attach_diagnostics(&mut verdict, diagnostics);
        if verdict.conflict_count > 0 {
            events::contradiction_detected(&effective, &verdict.conflicts);
        }

        Settled {
            verdict,
            rewritten_query,
            query_type,
            evidence,
            draft: Some(draft),
        }
    }

    async fn retrieve(
        &self,
        corpus: &CorpusSnapshot,
        query: &str,
        diagnostics: &mut Vec<DegradationEvent>,
    ) -> HybridRetrieval {
        let span = retrieval_span!(query, classify(query));
        match self.retriever.retrieve(corpus, query, None).instrument(span).await {
            Ok(retrieval) => {
                events::evidence_fused(
                    retrieval.vector_hits,
                    retrieval.graph_hits,
                    retrieval.evidence.len(),
                );
                diagnostics.extend(retrieval.diagnostics.iter().cloned());
                retrieval
            }
            Err(e) => {
                warn!(error = %e, "retrieval failed");
                diagnostics.push(DegradationEvent::new("retrieval", e.to_string(), "no_evidence"));
                HybridRetrieval::default()
            }
        }
    }

    /// Put pipeline diagnostics ahead of the verifier's own, plus any
    /// embedding fallbacks taken since the last drain.
    fn attach_diagnostics(
        &self,
        verdict: &mut VerificationVerdict,
        mut diagnostics: Vec<DegradationEvent>,
    ) {
        diagnostics.extend(self.embeddings.drain_degradation_events());
        diagnostics.append(&mut verdict.diagnostics);
        verdict.diagnostics = diagnostics;
    }

    async fn complete(
        &self,
        query: &str,
        session: &ResolvedSession,
        settled: Settled,
        started: Instant,
    ) -> AnswerOutcome {
        let Settled {
            mut verdict,
            rewritten_query,
            query_type,
            evidence,
            draft,
        } = settled;
        let response = format::render(draft.as_deref(), &verdict);

        let turn = self.sessions.record_turn(&session.id, query, &response.text).await;
        if turn.folded > 0 {
            events::session_folded(&session.id, turn.summary_version);
        }
        if let Some(event) = &turn.degradation {
            verdict.diagnostics.push(event.clone());
        }
        for event in &verdict.diagnostics {
            events::degradation_triggered(event);
        }
        events::verdict_settled(&verdict);

        let outcome = AnswerOutcome {
            response,
            fresh_session: session.is_fresh(),
            session_id: session.id.clone(),
            rewritten_query,
            query_type,
            evidence,
            draft,
            turn: Some(turn),
            latency: started.elapsed(),
            verdict,
        };
        self.log(query, &outcome);
        outcome
    }

    fn timed_out(
        &self,
        query: &str,
        session: &ResolvedSession,
        deadline: Duration,
        started: Instant,
    ) -> AnswerOutcome {
        let millis = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);
        let error = AulaError::Timeout { millis };
        warn!(error = %error, "deadline elapsed, partial results dropped");

        let mut verdict = self.verifier.abstain_without_draft(
            query,
            &FusedEvidence::default(),
            AbstentionReason::Timeout,
        );
        verdict
            .diagnostics
            .push(DegradationEvent::new("answer", error.to_string(), "timeout_abstention"));
        events::verdict_settled(&verdict);

        let outcome = AnswerOutcome {
            response: format::render(None, &verdict),
            fresh_session: session.is_fresh(),
            session_id: session.id.clone(),
            rewritten_query: None,
            query_type: QueryType::Unclassified,
            evidence: FusedEvidence::default(),
            draft: None,
            turn: None,
            latency: started.elapsed(),
            verdict,
        };
        self.log(query, &outcome);
        outcome
    }

    fn log(&self, query: &str, outcome: &AnswerOutcome) {
        let mut entry = QueryLogEntry::new(
            query,
            outcome.query_type,
            outcome.latency,
            outcome.evidence.len(),
            outcome.response.status,
            outcome.verdict.id,
        )
        .with_reason(outcome.verdict.reason);
        if let Some(rewritten) = &outcome.rewritten_query {
            entry = entry.with_rewrite(rewritten.clone());
        }
        debug!(
            verdict = %outcome.verdict.id,
            latency_ms = outcome.latency.as_millis() as u64,
            "answer complete"
        );
        self.query_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(entry);
    }
}
