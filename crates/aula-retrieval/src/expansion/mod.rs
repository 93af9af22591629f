//! Query enhancement: HyDE embedding plus synonym and paraphrase variants.
//!
//! Generator failures never fail enhancement: HyDE falls back to the raw
//! query embedding and paraphrases fall back to synonym-only expansion, each
//! recorded as a `DegradationEvent`.

pub mod hyde;
mod merge;
pub mod paraphrase;
pub mod synonyms;

use std::sync::Arc;

use aula_core::config::ExpansionConfig;
use aula_core::constants::MAX_QUERY_VARIANTS;
use aula_core::errors::AulaResult;
use aula_core::models::DegradationEvent;
use aula_core::text;
use aula_core::traits::{IEmbeddingProvider, ITextGenerator};
use futures::future::join_all;
use tracing::{debug, warn};

pub use merge::merge_variant_results;

/// Where a query variant came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Synonym,
    Paraphrase,
}

#[derive(Debug, Clone)]
pub struct QueryVariant {
    pub text: String,
    pub kind: VariantKind,
    pub embedding: Vec<f32>,
}

/// The enhanced form of one query.
#[derive(Debug, Clone)]
pub struct EnhancedQuery {
    pub query: String,
    /// Raw query embedding, blended with the HyDE embedding when available.
    pub primary_embedding: Vec<f32>,
    /// Provider that embedded the query; every embedding here shares its space.
    pub provider: String,
    pub hypothetical: Option<String>,
    pub variants: Vec<QueryVariant>,
    pub diagnostics: Vec<DegradationEvent>,
}

impl EnhancedQuery {
    /// Primary embedding followed by every variant embedding.
    pub fn embeddings(&self) -> impl Iterator<Item = &[f32]> {
        std::iter::once(self.primary_embedding.as_slice())
            .chain(self.variants.iter().map(|v| v.embedding.as_slice()))
    }
}

pub struct QueryEnhancer {
    embedder: Arc<dyn IEmbeddingProvider>,
    generator: Option<Arc<dyn ITextGenerator>>,
    config: ExpansionConfig,
}

impl QueryEnhancer {
    pub fn new(
        embedder: Arc<dyn IEmbeddingProvider>,
        generator: Option<Arc<dyn ITextGenerator>>,
        config: ExpansionConfig,
    ) -> Self {
        Self {
            embedder,
            generator,
            config,
        }
    }

    /// Embed the query, its hypothetical answer, and its variants.
    ///
    /// Fails only when the query itself cannot be embedded.
    pub async fn enhance(&self, query: &str) -> AulaResult<EnhancedQuery> {
        let mut diagnostics = Vec::new();

        let (query_embedding, hypothetical, paraphrases) = tokio::join!(
            self.embedder.embed_tagged(query),
            self.hypothetical(query),
            self.paraphrases(query),
        );
        let (query_embedding, provider) = query_embedding?;

        let hypothetical = match hypothetical {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "HyDE generation failed, using raw query embedding");
                diagnostics.push(DegradationEvent::new(
                    "hyde",
                    e.to_string(),
                    "raw_query_embedding",
                ));
                None
            }
        };

        let primary_embedding = match &hypothetical {
            Some(doc) => match self.embedder.embed_tagged(doc).await {
                Ok((hyde_embedding, by)) if by == provider => {
                    hyde::blend(&hyde_embedding, &query_embedding, self.config.hyde_alpha)?
                }
                Ok((_, by)) => {
                    diagnostics.push(mixed_space("hyde", &by, &provider, "raw_query_embedding"));
                    query_embedding.clone()
                }
                Err(e) => {
                    diagnostics.push(DegradationEvent::new(
                        "hyde",
                        e.to_string(),
                        "raw_query_embedding",
                    ));
                    query_embedding.clone()
                }
            },
            None => query_embedding.clone(),
        };

        let paraphrases = match paraphrases {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "paraphrase generation failed, synonym-only expansion");
                diagnostics.push(DegradationEvent::new(
                    "paraphrase",
                    e.to_string(),
                    "synonym_only",
                ));
                Vec::new()
            }
        };

        let candidates = self.variant_texts(query, paraphrases);
        let embedded =
            join_all(candidates.iter().map(|(t, _)| self.embedder.embed_tagged(t))).await;

        let mut variants = Vec::with_capacity(candidates.len());
        for ((text, kind), embedding) in candidates.into_iter().zip(embedded) {
            match embedding {
                Ok((embedding, by)) if by == provider => variants.push(QueryVariant {
                    text,
                    kind,
                    embedding,
                }),
                Ok((_, by)) => diagnostics.push(mixed_space(
                    "query_variant",
                    &by,
                    &provider,
                    "variant_dropped",
                )),
                Err(e) => diagnostics.push(DegradationEvent::new(
                    "query_variant",
                    e.to_string(),
                    "variant_dropped",
                )),
            }
        }

        debug!(
            variants = variants.len(),
            hyde = hypothetical.is_some(),
            degraded = diagnostics.len(),
            "query enhanced"
        );

        Ok(EnhancedQuery {
            query: query.to_string(),
            primary_embedding,
            provider,
            hypothetical,
            variants,
            diagnostics,
        })
    }

    async fn hypothetical(&self, query: &str) -> AulaResult<Option<String>> {
        let Some(generator) = self.generator.as_ref().filter(|_| self.config.hyde_enabled) else {
            return Ok(None);
        };
        let output = generator
            .generate(&hyde::prompt(query), self.config.hyde_max_tokens)
            .await?;
        Ok(hyde::clean(&output))
    }

    async fn paraphrases(&self, query: &str) -> AulaResult<Vec<String>> {
        let count = self.config.paraphrase_count;
        let Some(generator) = self.generator.as_ref().filter(|_| count > 0) else {
            return Ok(Vec::new());
        };
        let output = generator
            .generate(
                &paraphrase::prompt(query, count),
                self.config.paraphrase_max_tokens,
            )
            .await?;
        Ok(paraphrase::parse(&output, query, count))
    }

    /// Synonym variant first, then paraphrases; deduplicated, capped.
    fn variant_texts(&self, query: &str, paraphrases: Vec<String>) -> Vec<(String, VariantKind)> {
        let mut seen = vec![text::fold(query)];
        let mut out = Vec::new();

        let synonym = self
            .config
            .synonyms_enabled
            .then(|| synonyms::expand(query))
            .flatten();
        let candidates = synonym
            .into_iter()
            .map(|t| (t, VariantKind::Synonym))
            .chain(paraphrases.into_iter().map(|t| (t, VariantKind::Paraphrase)));

        for (text, kind) in candidates {
            let key = text::fold(&text);
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            out.push((text, kind));
            if out.len() >= MAX_QUERY_VARIANTS {
                break;
            }
        }
        out
    }
}

fn mixed_space(
    component: &str,
    by: &str,
    query_provider: &str,
    fallback: &str,
) -> DegradationEvent {
    DegradationEvent::new(
        component,
        format!("embedded by {by}, query embedded by {query_provider}"),
        fallback,
    )
}
