//! HybridRetriever: orchestrates the full retrieval pipeline.
//!
//! query → classify + resolve entities → (enhance → vector per variant → merge)
//! ∥ graph neighborhood → weighted RRF → fused evidence.

use std::sync::Arc;

use aula_core::config::{AulaConfig, GraphConfig, RetrievalConfig, RetrievalMode};
use aula_core::errors::AulaResult;
use aula_core::models::{DegradationEvent, EntityId, FusedEvidence, MetadataFilter, RetrievalResult};
use aula_core::traits::{IGraphStore, IVectorIndex};
use aula_core::QueryType;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::expansion::{merge_variant_results, QueryEnhancer};
use crate::fusion::{classify, rrf, FusionWeights};
use crate::graph::GraphRetriever;
use crate::vector::{VectorOptions, VectorRetriever};

/// The read-only corpus a query runs against. Swapped as a whole between queries.
#[derive(Clone)]
pub struct CorpusSnapshot {
    pub index: Arc<dyn IVectorIndex>,
    pub graph: Arc<dyn IGraphStore>,
    /// Provider whose vector space the index was built in. `None` skips the
    /// check.
    pub embedded_with: Option<String>,
}

impl CorpusSnapshot {
    pub fn new(index: Arc<dyn IVectorIndex>, graph: Arc<dyn IGraphStore>) -> Self {
        Self {
            index,
            graph,
            embedded_with: None,
        }
    }

    pub fn with_embedding_provider(mut self, provider: impl Into<String>) -> Self {
        self.embedded_with = Some(provider.into());
        self
    }

    /// Whether query vectors from `provider` can be searched against the index.
    pub fn accepts_vectors_from(&self, provider: &str) -> bool {
        self.embedded_with.as_deref().map_or(true, |p| p == provider)
    }
}

/// Evidence plus everything learned while retrieving it.
#[derive(Debug, Clone, Default)]
pub struct HybridRetrieval {
    pub evidence: FusedEvidence,
    pub query_type: QueryType,
    pub matched_entities: Vec<EntityId>,
    pub variant_count: usize,
    pub vector_hits: usize,
    pub graph_hits: usize,
    pub diagnostics: Vec<DegradationEvent>,
}

pub struct HybridRetriever {
    enhancer: Arc<QueryEnhancer>,
    weights: FusionWeights,
    retrieval: RetrievalConfig,
    graph: GraphConfig,
    rrf_k: u32,
}

impl HybridRetriever {
    pub fn new(enhancer: Arc<QueryEnhancer>, config: &AulaConfig) -> Self {
        Self {
            enhancer,
            weights: FusionWeights::from_config(&config.fusion),
            retrieval: config.retrieval.clone(),
            graph: config.graph.clone(),
            rrf_k: config.fusion.rrf_k,
        }
    }

    /// Run both retrievers concurrently and fuse their results.
    ///
    /// Retriever failures degrade to an empty list for that source.
    pub async fn retrieve(
        &self,
        corpus: &CorpusSnapshot,
        query: &str,
        filter: Option<MetadataFilter>,
    ) -> AulaResult<HybridRetrieval> {
        let query_type = classify(query);
        let matched_entities = corpus.graph.resolve_entities(query);
        debug!(%query_type, entities = matched_entities.len(), "query analyzed");

        let use_vector = self.retrieval.mode != RetrievalMode::GraphOnly;
        let use_graph = self.retrieval.mode != RetrievalMode::VectorOnly;

        let vector_branch = async {
            if !use_vector {
                return (Vec::new(), 0, Vec::new());
            }
            self.vector_branch(corpus, query, filter).await
        };
        let graph_branch = async {
            if !use_graph || matched_entities.is_empty() {
                return (Vec::new(), Vec::new());
            }
            self.graph_branch(corpus, &matched_entities)
        };

        let ((vector_results, variant_count, mut diagnostics), (graph_results, graph_diag)) =
            tokio::join!(vector_branch, graph_branch);
        diagnostics.extend(graph_diag);

        let vector_hits = vector_results.len();
        let graph_hits = graph_results.len();

        let weights = self.weights.for_query(query_type);
        let lists = [vector_results, graph_results];
        let evidence = rrf::fuse(&lists, |id| corpus.index.chunk(id), weights, self.rrf_k);

        info!(
            %query_type,
            vector_hits,
            graph_hits,
            evidence = evidence.len(),
            "hybrid retrieval complete"
        );

        Ok(HybridRetrieval {
            evidence,
            query_type,
            matched_entities,
            variant_count,
            vector_hits,
            graph_hits,
            diagnostics,
        })
    }

    async fn vector_branch(
        &self,
        corpus: &CorpusSnapshot,
        query: &str,
        filter: Option<MetadataFilter>,
    ) -> (Vec<RetrievalResult>, usize, Vec<DegradationEvent>) {
        let enhanced = match self.enhancer.enhance(query).await {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "query embedding failed, vector retrieval skipped");
                return (
                    Vec::new(),
                    0,
                    vec![DegradationEvent::new("vector_retrieval", e.to_string(), "graph_only")],
                );
            }
        };

        if !corpus.accepts_vectors_from(&enhanced.provider) {
            let indexed = corpus.embedded_with.as_deref().unwrap_or_default();
            warn!(
                query_provider = %enhanced.provider,
                index_provider = indexed,
                "query embedded outside the index's vector space, vector retrieval skipped"
            );
            let mut diagnostics = enhanced.diagnostics;
            diagnostics.push(DegradationEvent::new(
                "vector_retrieval",
                format!("query embedded by {}, index built with {indexed}", enhanced.provider),
                "graph_only",
            ));
            return (Vec::new(), 0, diagnostics);
        }

        let retriever = VectorRetriever::new(Arc::clone(&corpus.index));
        let options = VectorOptions::from_config(&self.retrieval).with_filter(filter);
        let k = self.retrieval.top_k;
        let embeddings: Vec<&[f32]> = enhanced.embeddings().collect();

        let outcomes: Vec<AulaResult<Vec<RetrievalResult>>> = embeddings
            .par_iter()
            .map(|embedding| retriever.retrieve(embedding, k, &options))
            .collect();

        let mut diagnostics = enhanced.diagnostics.clone();
        let mut lists = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                Ok(list) => lists.push(list),
                Err(e) => diagnostics.push(DegradationEvent::new(
                    "vector_retrieval",
                    e.to_string(),
                    "variant_skipped",
                )),
            }
        }

        let mut merged = merge_variant_results(lists);
        merged.truncate(k);
        (merged, enhanced.variants.len(), diagnostics)
    }

    fn graph_branch(
        &self,
        corpus: &CorpusSnapshot,
        entities: &[EntityId],
    ) -> (Vec<RetrievalResult>, Vec<DegradationEvent>) {
        let retriever = GraphRetriever::new(Arc::clone(&corpus.graph), self.graph.clone());
        match retriever.retrieve(entities, self.graph.max_hops) {
            Ok(mut found) => {
                found.results.truncate(self.retrieval.top_k);
                (found.results, Vec::new())
            }
            Err(e) => {
                warn!(error = %e, "graph retrieval failed, vector-only fusion");
                (
                    Vec::new(),
                    vec![DegradationEvent::new("graph_retrieval", e.to_string(), "vector_only")],
                )
            }
        }
    }
}
