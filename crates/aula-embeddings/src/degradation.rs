//! Fallback chain for embedding generation.
//!
//! Providers are tried in order. Every fallback is recorded as a
//! `DegradationEvent` that callers drain into their diagnostics.

use std::sync::{Arc, Mutex};

use aula_core::errors::{AulaError, AulaResult, EmbeddingError};
use aula_core::models::DegradationEvent;
use aula_core::traits::IEmbeddingProvider;
use tracing::warn;

pub struct DegradationChain {
    chain: Vec<Arc<dyn IEmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Arc<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    /// Embed with the first provider that succeeds. Returns the provider name.
    pub async fn embed(&self, text: &str) -> AulaResult<(Vec<f32>, &str)> {
        let mut last_error = None;
        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match provider.embed(text).await {
                Ok(vec) => {
                    if i > 0 {
                        self.record_fallback(provider.name());
                    }
                    return Ok((vec, provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(exhausted))
    }

    /// Batch variant of [`DegradationChain::embed`].
    pub async fn embed_batch(&self, texts: &[String]) -> AulaResult<(Vec<Vec<f32>>, &str)> {
        let mut last_error = None;
        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }
            match provider.embed_batch(texts).await {
                Ok(vecs) => {
                    if i > 0 {
                        self.record_fallback(provider.name());
                    }
                    return Ok((vecs, provider.name()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "batch embed failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(exhausted))
    }

    fn record_fallback(&self, fallback: &str) {
        let primary = self.chain.first().map(|p| p.name()).unwrap_or("unknown");
        let event = DegradationEvent::new("embeddings", format!("{primary} unavailable"), fallback);
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// The provider called `name`, if it is in the chain.
    pub fn provider(&self, name: &str) -> Option<&Arc<dyn IEmbeddingProvider>> {
        self.chain.iter().find(|p| p.name() == name)
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

fn exhausted() -> AulaError {
    EmbeddingError::ProviderUnavailable {
        provider: "all providers exhausted".to_string(),
    }
    .into()
}
