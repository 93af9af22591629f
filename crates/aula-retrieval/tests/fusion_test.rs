//! Property tests for weighted RRF fusion and MMR selection.

use std::collections::HashMap;

use aula_core::config::SourceWeights;
use aula_core::models::{Chunk, GraphTrace, Provenance, RetrievalResult};
use aula_retrieval::fusion::{classify, rrf, FusionWeights};
use aula_retrieval::vector::mmr::{self, MmrCandidate};
use proptest::prelude::*;

const POOL: [&str; 12] = [
    "c00", "c01", "c02", "c03", "c04", "c05", "c06", "c07", "c08", "c09", "c10", "c11",
];

fn chunks() -> HashMap<String, Chunk> {
    POOL.iter()
        .map(|id| (id.to_string(), Chunk::new(*id, *id, "doc", "sec", vec![1.0, 0.0])))
        .collect()
}

fn ranked(ids: &[&str], provenance: Provenance) -> Vec<RetrievalResult> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| match provenance {
            Provenance::Vector => RetrievalResult::vector(*id, 1.0 - i as f64 * 0.01, i + 1),
            Provenance::Graph => RetrievalResult::graph(
                *id,
                1.0 - i as f64 * 0.01,
                i + 1,
                GraphTrace {
                    entity_id: "e".into(),
                    hops: 0,
                    path: vec!["e".into()],
                    description: "e".into(),
                },
            ),
        })
        .collect()
}

fn list_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(POOL.to_vec(), 0..=POOL.len()).prop_shuffle()
}

fn weights_strategy() -> impl Strategy<Value = SourceWeights> {
    (0.05f64..1.0, 0.05f64..1.0).prop_map(|(v, g)| SourceWeights::new(v, g))
}

proptest! {
    #[test]
    fn fused_evidence_never_repeats_a_chunk(
        vector in list_strategy(),
        graph in list_strategy(),
        extra in list_strategy(),
        weights in weights_strategy(),
    ) {
        let store = chunks();
        // A second vector list with overlapping ids exercises per-list dedup.
        let lists = vec![
            ranked(&vector, Provenance::Vector),
            ranked(&graph, Provenance::Graph),
            ranked(&extra, Provenance::Vector),
        ];
        let fused = rrf::fuse(&lists, |id| store.get(id), weights, 60);

        let mut ids = fused.chunk_ids();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), n);

        let mut expected: Vec<&str> = vector.iter().chain(&graph).chain(&extra).copied().collect();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(n, expected.len());
    }

    #[test]
    fn fused_scores_are_non_increasing(
        vector in list_strategy(),
        graph in list_strategy(),
        weights in weights_strategy(),
    ) {
        let store = chunks();
        let lists = vec![ranked(&vector, Provenance::Vector), ranked(&graph, Provenance::Graph)];
        let fused = rrf::fuse(&lists, |id| store.get(id), weights, 60);
        for pair in fused.items.windows(2) {
            prop_assert!(pair[0].fused_score >= pair[1].fused_score);
        }
    }

    #[test]
    fn both_source_items_never_rank_below_single_source_items_of_equal_rank(
        vector in list_strategy(),
        graph in list_strategy(),
        weights in weights_strategy(),
    ) {
        let store = chunks();
        let lists = vec![ranked(&vector, Provenance::Vector), ranked(&graph, Provenance::Graph)];
        let fused = rrf::fuse(&lists, |id| store.get(id), weights, 60);

        for (i, both) in fused.iter().enumerate() {
            if both.provenance.len() != 2 {
                continue;
            }
            for (j, single) in fused.iter().enumerate() {
                if single.provenance.len() != 1 {
                    continue;
                }
                let source = *single.provenance.iter().next().unwrap();
                if both.source_ranks[&source] <= single.source_ranks[&source] {
                    prop_assert!(i < j, "{} ranked below {}", both.chunk.id, single.chunk.id);
                }
            }
        }
    }

    #[test]
    fn mmr_selects_distinct_indices_led_by_the_most_relevant(
        embeddings in proptest::collection::vec(proptest::collection::vec(-1.0f32..1.0, 4), 1..20),
        relevances in proptest::collection::vec(0.0f64..1.0, 20),
        k in 1usize..10,
        lambda in 0.0f64..=1.0,
    ) {
        let candidates: Vec<MmrCandidate<'_>> = embeddings
            .iter()
            .zip(&relevances)
            .map(|(e, r)| MmrCandidate { embedding: e, relevance: *r })
            .collect();
        let picked = mmr::select(&candidates, k, lambda);

        prop_assert_eq!(picked.len(), k.min(candidates.len()));
        let mut unique = picked.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), picked.len());

        let best = candidates
            .iter()
            .map(|c| c.relevance)
            .fold(f64::MIN, f64::max);
        prop_assert_eq!(candidates[picked[0]].relevance, best);
    }
}

#[test]
fn query_type_selects_the_source_weights() {
    let weights = FusionWeights::default();
    let factual = weights.for_query(classify("¿Cuál es la asistencia mínima?"));
    assert!(factual.vector > factual.graph);
    let relational = weights.for_query(classify("¿Qué requisitos necesito para la MIA?"));
    assert!(relational.graph > relational.vector);
    let unclassified = weights.for_query(classify("hola"));
    assert_eq!(unclassified.vector, unclassified.graph);
}
