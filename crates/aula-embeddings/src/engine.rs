//! EmbeddingEngine: the main entry point for aula-embeddings.
//!
//! Coordinates the provider fallback chain and the L1 cache.
//! Implements `IEmbeddingProvider`.

use std::sync::Arc;

use async_trait::async_trait;
use aula_core::config::EmbeddingConfig;
use aula_core::errors::{AulaResult, EmbeddingError};
use aula_core::models::DegradationEvent;
use aula_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::L1MemoryCache;
use crate::degradation::DegradationChain;
use crate::providers::HashedTfIdf;

/// Caching embedding engine with a hashed TF-IDF last resort.
pub struct EmbeddingEngine {
    chain: DegradationChain,
    cache: L1MemoryCache,
    config: EmbeddingConfig,
}

impl EmbeddingEngine {
    /// Engine backed only by the hashed TF-IDF provider.
    pub fn new(config: EmbeddingConfig) -> Self {
        Self::build(None, config)
    }

    /// Engine with an external primary provider, falling back to hashed TF-IDF.
    pub fn with_provider(primary: Arc<dyn IEmbeddingProvider>, config: EmbeddingConfig) -> Self {
        Self::build(Some(primary), config)
    }

    fn build(primary: Option<Arc<dyn IEmbeddingProvider>>, config: EmbeddingConfig) -> Self {
        let mut chain = DegradationChain::new();
        if let Some(primary) = primary {
            chain.push(primary);
        }
        chain.push(Arc::new(HashedTfIdf::new(config.dimensions)));

        let cache = L1MemoryCache::new(config.l1_cache_size);

        info!(
            provider = chain.active_provider_name(),
            dims = config.dimensions,
            "EmbeddingEngine initialized"
        );

        Self {
            chain,
            cache,
            config,
        }
    }

    fn check_dimensions(&self, embedding: &[f32]) -> AulaResult<()> {
        if embedding.len() != self.config.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: embedding.len(),
            }
            .into());
        }
        Ok(())
    }

    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        self.chain.drain_events()
    }

    pub fn active_provider(&self) -> &str {
        self.chain.active_provider_name()
    }

    pub fn cache(&self) -> &L1MemoryCache {
        &self.cache
    }

    fn cached(&self, provider: &str, texts: &[String]) -> Vec<Option<Vec<f32>>> {
        texts
            .iter()
            .map(|t| self.cache.get(&L1MemoryCache::key_for(provider, t)))
            .collect()
    }

    /// Check, cache, and slot freshly embedded vectors at `positions`.
    fn store(
        &self,
        provider: &str,
        positions: &[usize],
        texts: &[String],
        vecs: Vec<Vec<f32>>,
        out: &mut [Option<Vec<f32>>],
    ) -> AulaResult<()> {
        if vecs.len() != positions.len() {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("expected {} embeddings, got {}", positions.len(), vecs.len()),
            }
            .into());
        }
        for (&i, vec) in positions.iter().zip(vecs) {
            self.check_dimensions(&vec)?;
            self.cache.insert(L1MemoryCache::key_for(provider, &texts[i]), vec.clone());
            out[i] = Some(vec);
        }
        Ok(())
    }
}

#[async_trait]
impl IEmbeddingProvider for EmbeddingEngine {
    async fn embed(&self, text: &str) -> AulaResult<Vec<f32>> {
        Ok(self.embed_tagged(text).await?.0)
    }

    async fn embed_batch(&self, texts: &[String]) -> AulaResult<Vec<Vec<f32>>> {
        Ok(self.embed_batch_tagged(texts).await?.0)
    }

    async fn embed_tagged(&self, text: &str) -> AulaResult<(Vec<f32>, String)> {
        let active = self.chain.active_provider_name();
        let key = L1MemoryCache::key_for(active, text);
        if let Some(vec) = self.cache.get(&key) {
            debug!(hash = %key, provider = active, "embedding cache hit");
            return Ok((vec, active.to_string()));
        }

        let (embedding, provider) = self.chain.embed(text).await?;
        self.check_dimensions(&embedding)?;
        debug!(provider, "embedded text");

        // Only completed embeddings are cached.
        self.cache.insert(L1MemoryCache::key_for(provider, text), embedding.clone());
        Ok((embedding, provider.to_string()))
    }

    async fn embed_batch_tagged(&self, texts: &[String]) -> AulaResult<(Vec<Vec<f32>>, String)> {
        let active = self.chain.active_provider_name();
        let mut out = self.cached(active, texts);

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        if missing.is_empty() {
            return Ok((out.into_iter().flatten().collect(), active.to_string()));
        }

        let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
        let (vecs, provider) = self.chain.embed_batch(&batch).await?;
        self.store(provider, &missing, texts, vecs, &mut out)?;

        // A fallback answered: cached hits of the active provider live in
        // another vector space and are re-embedded with the one that answered.
        if provider != active {
            out = self.cached(provider, texts);
            let stale: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
            if !stale.is_empty() {
                let fallback = self
                    .chain
                    .provider(provider)
                    .ok_or_else(|| EmbeddingError::ProviderUnavailable {
                        provider: provider.to_string(),
                    })?;
                let batch: Vec<String> = stale.iter().map(|&i| texts[i].clone()).collect();
                let vecs = fallback.embed_batch(&batch).await?;
                self.store(provider, &stale, texts, vecs, &mut out)?;
            }
        }

        Ok((out.into_iter().flatten().collect(), provider.to_string()))
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "aula-embedding-engine"
    }
}
