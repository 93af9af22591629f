use async_trait::async_trait;

use crate::errors::AulaResult;

/// Embedding generation provider.
#[async_trait]
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed a single text, returning a vector of floats.
    async fn embed(&self, text: &str) -> AulaResult<Vec<f32>>;

    /// Embed a batch of texts.
    async fn embed_batch(&self, texts: &[String]) -> AulaResult<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Embed `text` and name the provider whose vector space the result lives in.
    ///
    /// Providers that delegate to others override this; vectors from different
    /// providers are not comparable.
    async fn embed_tagged(&self, text: &str) -> AulaResult<(Vec<f32>, String)> {
        let vector = self.embed(text).await?;
        Ok((vector, self.name().to_string()))
    }

    /// Batch variant of [`IEmbeddingProvider::embed_tagged`]. Every vector of
    /// the batch comes from the same provider.
    async fn embed_batch_tagged(&self, texts: &[String]) -> AulaResult<(Vec<Vec<f32>>, String)> {
        let vectors = self.embed_batch(texts).await?;
        Ok((vectors, self.name().to_string()))
    }

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool {
        true
    }
}
