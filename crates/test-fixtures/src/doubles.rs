//! Deterministic stand-ins for the external collaborators.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use aula_core::errors::{AulaResult, EmbeddingError, GenerationError};
use aula_core::models::{ChatHistory, FusedEvidence};
use aula_core::text;
use aula_core::traits::{
    IAnswerSynthesizer, IContactDirectory, IEmbeddingProvider, INliScorer, ITextGenerator,
};
use aula_embeddings::providers::HashedTfIdf;

use crate::FIXTURE_DIMENSIONS;

// ── Embeddings ────────────────────────────────────────────────────────────

/// Bag-of-words hashing embedder. Identical texts embed identically.
pub struct HashingEmbedder {
    inner: HashedTfIdf,
    dimensions: usize,
    calls: AtomicUsize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            inner: HashedTfIdf::new(dimensions),
            dimensions,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        self.inner.vectorize(text)
    }

    /// Number of `embed` calls served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(FIXTURE_DIMENSIONS)
    }
}

#[async_trait]
impl IEmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> AulaResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectorize(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing-test-embedder"
    }
}

/// An embedding service that is always down.
pub struct FailingEmbedder {
    dimensions: usize,
}

impl FailingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for FailingEmbedder {
    fn default() -> Self {
        Self::new(FIXTURE_DIMENSIONS)
    }
}

#[async_trait]
impl IEmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> AulaResult<Vec<f32>> {
        Err(EmbeddingError::ProviderUnavailable {
            provider: "failing-embedder".to_string(),
        }
        .into())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "failing-embedder"
    }

    fn is_available(&self) -> bool {
        false
    }
}

// ── Text generation ───────────────────────────────────────────────────────

/// Answers prompts by substring rules; unmatched prompts fail.
#[derive(Default)]
pub struct ScriptedGenerator {
    rules: Vec<(String, String)>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `response` to any prompt containing `needle`. First match wins.
    pub fn on_contains(mut self, needle: impl Into<String>, response: impl Into<String>) -> Self {
        self.rules.push((needle.into(), response.into()));
        self
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ITextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _max_tokens: usize) -> AulaResult<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| {
                GenerationError::Unavailable {
                    service: "scripted".to_string(),
                }
                .into()
            })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A generator that always errors.
#[derive(Default)]
pub struct FailingGenerator;

#[async_trait]
impl ITextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _max_tokens: usize) -> AulaResult<String> {
        Err(GenerationError::Failed {
            reason: "generator offline".to_string(),
        }
        .into())
    }

    fn name(&self) -> &str {
        "failing-generator"
    }
}

// ── Entailment ────────────────────────────────────────────────────────────

/// Entailment as the share of hypothesis tokens present in the premise.
#[derive(Default)]
pub struct LexicalNli;

impl LexicalNli {
    pub fn score(premise: &str, hypothesis: &str) -> f64 {
        let premise: HashSet<String> = text::tokens(&strip_brackets(premise)).into_iter().collect();
        let hypothesis: Vec<String> = text::tokens(&strip_brackets(hypothesis))
            .into_iter()
            .filter(|t| t.chars().count() >= 2 || t.chars().all(|c| c.is_ascii_digit()))
            .collect();
        if hypothesis.is_empty() {
            return 0.0;
        }
        let found = hypothesis.iter().filter(|t| premise.contains(*t)).count();
        found as f64 / hypothesis.len() as f64
    }
}

#[async_trait]
impl INliScorer for LexicalNli {
    async fn entails(&self, premise: &str, hypothesis: &str) -> AulaResult<f64> {
        Ok(Self::score(premise, hypothesis))
    }
}

/// An entailment service that is always down.
#[derive(Default)]
pub struct FailingNli;

#[async_trait]
impl INliScorer for FailingNli {
    async fn entails(&self, _premise: &str, _hypothesis: &str) -> AulaResult<f64> {
        Err(GenerationError::Unavailable {
            service: "nli".to_string(),
        }
        .into())
    }
}

fn strip_brackets(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

// ── Answer synthesis ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum DraftPart {
    Plain(String),
    Citing { chunk_id: String, sentence: String },
}

/// Produces a fixed draft. Citing sentences get the `[n]` marker of their
/// chunk's position in the evidence it is handed, when present.
#[derive(Default)]
pub struct ScriptedSynthesizer {
    parts: Vec<DraftPart>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    histories: Mutex<Vec<ChatHistory>>,
}

impl ScriptedSynthesizer {
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::default().then_plain(text)
    }

    pub fn citing(chunk_id: impl Into<String>, sentence: impl Into<String>) -> Self {
        Self::default().then_citing(chunk_id, sentence)
    }

    pub fn then_plain(mut self, sentence: impl Into<String>) -> Self {
        self.parts.push(DraftPart::Plain(sentence.into()));
        self
    }

    pub fn then_citing(mut self, chunk_id: impl Into<String>, sentence: impl Into<String>) -> Self {
        self.parts.push(DraftPart::Citing {
            chunk_id: chunk_id.into(),
            sentence: sentence.into(),
        });
        self
    }

    /// Sleep before answering, for deadline tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The chat history passed with the most recent draft request.
    pub fn last_history(&self) -> Option<ChatHistory> {
        self.histories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Render the draft against `evidence` without recording a call.
    pub fn render(&self, evidence: &FusedEvidence) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                DraftPart::Plain(s) => s.trim().to_string(),
                DraftPart::Citing { chunk_id, sentence } => {
                    match evidence.position_of(chunk_id) {
                        Some(pos) => with_marker(sentence.trim(), pos + 1),
                        None => sentence.trim().to_string(),
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn with_marker(sentence: &str, marker: usize) -> String {
    match sentence.char_indices().last() {
        Some((i, c)) if matches!(c, '.' | '!' | '?') => {
            format!("{} [{}]{}", &sentence[..i], marker, c)
        }
        _ => format!("{sentence} [{marker}]"),
    }
}

#[async_trait]
impl IAnswerSynthesizer for ScriptedSynthesizer {
    async fn draft(
        &self,
        _query: &str,
        evidence: &FusedEvidence,
        history: &ChatHistory,
    ) -> AulaResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.histories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(history.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.render(evidence))
    }
}

/// A synthesizer that always errors.
#[derive(Default)]
pub struct FailingSynthesizer;

#[async_trait]
impl IAnswerSynthesizer for FailingSynthesizer {
    async fn draft(
        &self,
        _query: &str,
        _evidence: &FusedEvidence,
        _history: &ChatHistory,
    ) -> AulaResult<String> {
        Err(GenerationError::Failed {
            reason: "synthesizer offline".to_string(),
        }
        .into())
    }
}

// ── Contacts ──────────────────────────────────────────────────────────────

/// Fixed topic → emails directory.
#[derive(Debug, Clone, Default)]
pub struct StaticContacts {
    entries: BTreeMap<String, Vec<String>>,
}

impl StaticContacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, topic: impl Into<String>, email: impl Into<String>) -> Self {
        self.entries.entry(topic.into()).or_default().push(email.into());
        self
    }
}

impl IContactDirectory for StaticContacts {
    fn lookup(&self, topic: &str) -> Vec<String> {
        self.entries.get(topic).cloned().unwrap_or_default()
    }
}
