//! End-to-end hybrid retrieval with deterministic collaborators.

use std::sync::Arc;

use aula_core::config::{AulaConfig, RetrievalMode};
use aula_core::models::{MetadataFilter, Provenance};
use aula_core::traits::{IEmbeddingProvider, IGraphStore, ITextGenerator, IVectorIndex};
use aula_core::QueryType;
use aula_embeddings::EmbeddingEngine;
use aula_retrieval::expansion::QueryEnhancer;
use aula_retrieval::graph::KnowledgeGraph;
use aula_retrieval::vector::InMemoryVectorIndex;
use aula_retrieval::{CorpusSnapshot, HybridRetriever};
use test_fixtures::{
    load_corpus, FailingEmbedder, FailingGenerator, HashingEmbedder, ScriptedGenerator,
    FIXTURE_DIMENSIONS,
};

fn corpus() -> CorpusSnapshot {
    let fixture = load_corpus();
    let embedder = HashingEmbedder::default();
    let index: Arc<dyn IVectorIndex> = Arc::new(
        InMemoryVectorIndex::from_chunks(FIXTURE_DIMENSIONS, fixture.embedded_chunks(&embedder))
            .unwrap(),
    );
    let graph: Arc<dyn IGraphStore> =
        Arc::new(KnowledgeGraph::from_json(&fixture.graph_json()).unwrap());
    CorpusSnapshot::new(index, graph)
}

fn empty_corpus() -> CorpusSnapshot {
    CorpusSnapshot::new(
        Arc::new(InMemoryVectorIndex::new(FIXTURE_DIMENSIONS)),
        Arc::new(KnowledgeGraph::new()),
    )
}

fn retriever_with(
    embedder: Arc<dyn IEmbeddingProvider>,
    generator: Option<Arc<dyn ITextGenerator>>,
    config: &AulaConfig,
) -> HybridRetriever {
    let enhancer = QueryEnhancer::new(embedder, generator, config.expansion.clone());
    HybridRetriever::new(Arc::new(enhancer), config)
}

fn retriever(config: &AulaConfig) -> HybridRetriever {
    retriever_with(Arc::new(HashingEmbedder::default()), None, config)
}

#[tokio::test]
async fn factual_query_finds_the_regulation_chunk_first() {
    let config = AulaConfig::default();
    let found = retriever(&config)
        .retrieve(&corpus(), "¿Cuál es la asistencia mínima?", None)
        .await
        .unwrap();

    assert_eq!(found.query_type, QueryType::Factual);
    assert!(found.matched_entities.is_empty());
    assert_eq!(found.graph_hits, 0);
    let first = &found.evidence.items[0];
    assert_eq!(first.chunk.id, "reg-asistencia");
    assert!(first.has(Provenance::Vector));
}

#[tokio::test]
async fn entity_query_fuses_both_sources_without_duplicates() {
    let config = AulaConfig::default();
    let found = retriever(&config)
        .retrieve(&corpus(), "¿En cuántos bimestres se cursa la CEIA?", None)
        .await
        .unwrap();

    assert_eq!(found.matched_entities, vec!["ceia".to_string()]);
    assert!(found.vector_hits > 0);
    assert!(found.graph_hits > 0);

    let ids = found.evidence.chunk_ids();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());

    let duracion = found
        .evidence
        .iter()
        .find(|i| i.chunk.id == "ceia-duracion")
        .expect("ceia-duracion in evidence");
    assert!(duracion.has(Provenance::Vector) && duracion.has(Provenance::Graph));
    assert!(duracion.graph_context.as_deref().is_some_and(|c| c.contains("CEIA")));
    assert_eq!(found.evidence.items[0].chunk.id, "ceia-duracion");
}

#[tokio::test]
async fn unrelated_query_yields_no_evidence() {
    let config = AulaConfig::default();
    let found = retriever(&config)
        .retrieve(&corpus(), "¿Cuánto cuesta la carrera?", None)
        .await
        .unwrap();
    assert_eq!(found.query_type, QueryType::OutOfDomain);
    assert!(found.evidence.is_empty());
}

#[tokio::test]
async fn empty_corpus_is_not_an_error() {
    let config = AulaConfig::default();
    let found = retriever(&config)
        .retrieve(&empty_corpus(), "¿Cuál es la asistencia mínima?", None)
        .await
        .unwrap();
    assert!(found.evidence.is_empty());
    assert!(found.diagnostics.is_empty());
}

#[tokio::test]
async fn program_filter_applies_to_vector_results() {
    let config = AulaConfig::default();
    let filter = MetadataFilter {
        programs: vec!["cese".into()],
        ..Default::default()
    };
    let found = retriever(&config)
        .retrieve(&corpus(), "¿Cuántos bimestres dura la especialización?", Some(filter))
        .await
        .unwrap();
    assert!(found.vector_hits > 0);
    for item in found.evidence.iter().filter(|i| i.has(Provenance::Vector)) {
        assert!(item.chunk.metadata.programs.iter().any(|p| p == "CESE"), "{}", item.chunk.id);
    }
}

#[tokio::test]
async fn retrieval_modes_disable_a_source() {
    let mut config = AulaConfig::default();
    config.retrieval.mode = RetrievalMode::VectorOnly;
    let found = retriever(&config)
        .retrieve(&corpus(), "¿En cuántos bimestres se cursa la CEIA?", None)
        .await
        .unwrap();
    assert_eq!(found.graph_hits, 0);
    assert!(found.evidence.iter().all(|i| !i.has(Provenance::Graph)));

    config.retrieval.mode = RetrievalMode::GraphOnly;
    let found = retriever(&config)
        .retrieve(&corpus(), "¿En cuántos bimestres se cursa la CEIA?", None)
        .await
        .unwrap();
    assert_eq!(found.vector_hits, 0);
    assert!(found.graph_hits > 0);
    assert!(found.evidence.iter().all(|i| !i.has(Provenance::Vector)));
}

// ── Degradation ───────────────────────────────────────────────────────────

#[tokio::test]
async fn generator_failure_degrades_to_synonym_variants() {
    let config = AulaConfig::default();
    let found = retriever_with(
        Arc::new(HashingEmbedder::default()),
        Some(Arc::new(FailingGenerator)),
        &config,
    )
    .retrieve(&corpus(), "¿Cuál es la asistencia mínima?", None)
    .await
    .unwrap();

    let components: Vec<&str> = found.diagnostics.iter().map(|d| d.component.as_str()).collect();
    assert!(components.contains(&"hyde"));
    assert!(components.contains(&"paraphrase"));
    // "asistencia" has a domain synonym.
    assert_eq!(found.variant_count, 1);
    assert_eq!(found.evidence.items[0].chunk.id, "reg-asistencia");
}

#[tokio::test]
async fn paraphrases_are_retrieved_as_variants() {
    let config = AulaConfig::default();
    let generator = ScriptedGenerator::new()
        .on_contains(
            "Respuesta hipotética",
            "La asistencia mínima exigida es del 75% de las clases.",
        )
        .on_contains(
            "Reformulaciones:",
            "1. ¿Qué porcentaje de asistencia se exige?\n2. ¿Cuántas clases hay que asistir?",
        );
    let found = retriever_with(
        Arc::new(HashingEmbedder::default()),
        Some(Arc::new(generator)),
        &config,
    )
    .retrieve(&corpus(), "¿Cuál es la asistencia mínima?", None)
    .await
    .unwrap();

    assert!(found.diagnostics.is_empty(), "{:?}", found.diagnostics);
    assert_eq!(found.variant_count, 3);
    assert_eq!(found.evidence.items[0].chunk.id, "reg-asistencia");
}

#[tokio::test]
async fn embedding_outage_falls_back_to_graph_only() {
    let config = AulaConfig::default();
    let found = retriever_with(Arc::new(FailingEmbedder::default()), None, &config)
        .retrieve(&corpus(), "¿En cuántos bimestres se cursa la CEIA?", None)
        .await
        .unwrap();

    assert_eq!(found.vector_hits, 0);
    assert!(found.graph_hits > 0);
    assert!(found
        .diagnostics
        .iter()
        .any(|d| d.component == "vector_retrieval" && d.fallback_used == "graph_only"));
    assert!(!found.evidence.is_empty());
}

#[tokio::test]
async fn fallback_query_vectors_are_not_searched_against_a_foreign_index() {
    let config = AulaConfig::default();
    // The primary is down, so the engine answers with its hashed fallback;
    // the index was built by the dense primary.
    let engine = EmbeddingEngine::with_provider(
        Arc::new(FailingEmbedder::default()),
        config.embedding.clone(),
    );
    let corpus = corpus().with_embedding_provider("failing-embedder");
    let found = retriever_with(Arc::new(engine), None, &config)
        .retrieve(&corpus, "¿En cuántos bimestres se cursa la CEIA?", None)
        .await
        .unwrap();

    assert_eq!(found.vector_hits, 0);
    assert!(found.graph_hits > 0);
    assert!(found.diagnostics.iter().any(|d| {
        d.component == "vector_retrieval"
            && d.fallback_used == "graph_only"
            && d.failure.contains("hashed-tfidf")
    }));
}

#[tokio::test]
async fn matching_provider_tag_keeps_vector_retrieval() {
    let config = AulaConfig::default();
    let corpus = corpus().with_embedding_provider("hashing-test-embedder");
    let found = retriever(&config)
        .retrieve(&corpus, "¿Cuál es la asistencia mínima?", None)
        .await
        .unwrap();

    assert!(found.vector_hits > 0);
    assert_eq!(found.evidence.items[0].chunk.id, "reg-asistencia");
}
