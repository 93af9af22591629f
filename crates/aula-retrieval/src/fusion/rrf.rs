//! Weighted Reciprocal Rank Fusion: score = Σ w_source / (k + rank)
//!
//! Ranks are 1-based. Each list is deduplicated by chunk before scoring, so a
//! chunk contributes at most once per list.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use aula_core::config::SourceWeights;
use aula_core::models::{Chunk, EvidenceItem, FusedEvidence, Provenance, RetrievalResult};
use tracing::debug;

use super::weights::weight_of;

#[derive(Default)]
struct Accumulator {
    score: f64,
    provenance: BTreeSet<Provenance>,
    source_scores: BTreeMap<Provenance, f64>,
    source_ranks: BTreeMap<Provenance, usize>,
    graph_context: Option<String>,
}

/// Fuse ranked lists into chunk-unique evidence.
///
/// `lookup` resolves chunk ids; results whose chunk is unknown are dropped.
/// Ordering: fused score descending, then more provenance tags, then chunk id.
pub fn fuse<'c, F>(
    ranked_lists: &[Vec<RetrievalResult>],
    lookup: F,
    weights: SourceWeights,
    k: u32,
) -> FusedEvidence
where
    F: Fn(&str) -> Option<&'c Chunk>,
{
    let mut acc: HashMap<&str, Accumulator> = HashMap::new();

    for list in ranked_lists {
        // Best (lowest) rank per chunk within this list.
        let mut best: HashMap<&str, &RetrievalResult> = HashMap::new();
        for result in list {
            let keep = best.get(result.chunk_id.as_str()).map_or(true, |b| result.rank < b.rank);
            if keep {
                best.insert(result.chunk_id.as_str(), result);
            }
        }

        for (chunk_id, result) in best {
            let contribution =
                weight_of(weights, result.provenance) / (f64::from(k) + result.rank.max(1) as f64);
            let entry = acc.entry(chunk_id).or_default();
            entry.score += contribution;
            entry.provenance.insert(result.provenance);
            let score = entry.source_scores.entry(result.provenance).or_insert(result.score);
            if result.score > *score {
                *score = result.score;
            }
            let rank = entry.source_ranks.entry(result.provenance).or_insert(result.rank);
            if result.rank < *rank {
                *rank = result.rank;
            }
            if entry.graph_context.is_none() {
                entry.graph_context = result.graph.as_ref().map(|g| g.description.clone());
            }
        }
    }

    let total = acc.len();
    let mut items: Vec<EvidenceItem> = acc
        .into_iter()
        .filter_map(|(chunk_id, a)| {
            lookup(chunk_id).map(|chunk| EvidenceItem {
                chunk: chunk.clone(),
                fused_score: a.score,
                provenance: a.provenance,
                source_scores: a.source_scores,
                source_ranks: a.source_ranks,
                graph_context: a.graph_context,
            })
        })
        .collect();

    items.sort_by(|a, b| {
        b.fused_score
            .partial_cmp(&a.fused_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.provenance.len().cmp(&a.provenance.len()))
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });

    debug!(
        lists = ranked_lists.len(),
        candidates = total,
        fused = items.len(),
        "rrf fusion"
    );

    FusedEvidence::new(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(ids: &[&str]) -> HashMap<String, Chunk> {
        ids.iter()
            .map(|id| (id.to_string(), Chunk::new(*id, *id, "doc", "sec", vec![1.0])))
            .collect()
    }

    fn graph(id: &str, rank: usize) -> RetrievalResult {
        RetrievalResult {
            chunk_id: id.into(),
            score: 0.5,
            provenance: Provenance::Graph,
            rank,
            graph: None,
        }
    }

    #[test]
    fn contributions_follow_weighted_rrf() {
        let store = chunks(&["a"]);
        let lists = vec![vec![RetrievalResult::vector("a", 0.9, 1)], vec![graph("a", 2)]];
        let fused = fuse(&lists, |id| store.get(id), SourceWeights::new(0.7, 0.3), 60);
        let expected = 0.7 / 61.0 + 0.3 / 62.0;
        assert!((fused.items[0].fused_score - expected).abs() < 1e-12);
        assert_eq!(fused.items[0].provenance.len(), 2);
    }

    #[test]
    fn duplicate_within_a_list_counts_once() {
        let store = chunks(&["a"]);
        let lists = vec![vec![
            RetrievalResult::vector("a", 0.9, 1),
            RetrievalResult::vector("a", 0.8, 3),
        ]];
        let fused = fuse(&lists, |id| store.get(id), SourceWeights::equal(), 60);
        assert_eq!(fused.len(), 1);
        assert!((fused.items[0].fused_score - 0.5 / 61.0).abs() < 1e-12);
        assert_eq!(fused.items[0].source_ranks[&Provenance::Vector], 1);
    }

    #[test]
    fn equal_scores_prefer_both_sources_then_chunk_id() {
        // With k = 1: rank 3 in both lists gives 0.5/4 + 0.5/4 = 0.25,
        // rank 1 in one list gives 0.5/2 = 0.25.
        let store = chunks(&["aa-solo", "zz-both", "mm-solo"]);
        let lists = vec![
            vec![
                RetrievalResult::vector("aa-solo", 0.9, 1),
                RetrievalResult::vector("x", 0.8, 2),
                RetrievalResult::vector("zz-both", 0.7, 3),
            ],
            vec![graph("mm-solo", 1), graph("y", 2), graph("zz-both", 3)],
        ];
        let fused = fuse(&lists, |id| store.get(id), SourceWeights::equal(), 1);
        assert_eq!(fused.chunk_ids(), vec!["zz-both", "aa-solo", "mm-solo"]);
        assert_eq!(fused.items[0].fused_score, fused.items[1].fused_score);
    }

    #[test]
    fn unknown_chunks_are_dropped() {
        let store = chunks(&["a"]);
        let lists = vec![vec![
            RetrievalResult::vector("a", 0.9, 1),
            RetrievalResult::vector("ghost", 0.8, 2),
        ]];
        let fused = fuse(&lists, |id| store.get(id), SourceWeights::equal(), 60);
        assert_eq!(fused.chunk_ids(), vec!["a"]);
    }

    #[test]
    fn empty_lists_fuse_to_empty() {
        let store = chunks(&[]);
        let fused = fuse(&[vec![], vec![]], |id| store.get(id), SourceWeights::equal(), 60);
        assert!(fused.is_empty());
    }
}
