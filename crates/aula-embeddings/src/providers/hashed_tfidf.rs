//! Hashed TF-IDF provider.
//!
//! Terms are accent-folded, hashed into fixed-dimension buckets with FNV-1a,
//! and weighted by frequency. Deterministic and always available.

use std::collections::HashMap;

use async_trait::async_trait;
use aula_core::errors::AulaResult;
use aula_core::text;
use aula_core::traits::IEmbeddingProvider;

use crate::math;

pub struct HashedTfIdf {
    dimensions: usize,
}

impl HashedTfIdf {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= u64::from(*b);
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    /// Dense vector for `text`; empty or symbol-only text yields the zero vector.
    pub fn vectorize(&self, text: &str) -> Vec<f32> {
        let tokens: Vec<String> = text::tokens(text)
            .into_iter()
            .filter(|t| t.chars().count() >= 2)
            .collect();
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in tf {
            // Short terms are mostly stopwords.
            let idf = 1.0 + (term.chars().count() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += (count / total) * idf;
        }

        math::normalize(&mut vec);
        vec
    }
}

#[async_trait]
impl IEmbeddingProvider for HashedTfIdf {
    async fn embed(&self, text: &str) -> AulaResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> AulaResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed-tfidf"
    }
}
