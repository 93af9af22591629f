//! Merging of per-variant result lists before fusion.

use std::collections::HashMap;

use aula_core::models::RetrievalResult;

/// Collapse duplicate chunks across variant lists, keeping each chunk's best
/// rank (ties: higher score), then re-rank 1..n by that best rank.
pub fn merge_variant_results(lists: Vec<Vec<RetrievalResult>>) -> Vec<RetrievalResult> {
    let mut best: HashMap<String, RetrievalResult> = HashMap::new();
    for result in lists.into_iter().flatten() {
        match best.get(&result.chunk_id) {
            Some(existing)
                if existing.rank < result.rank
                    || (existing.rank == result.rank && existing.score >= result.score) => {}
            _ => {
                best.insert(result.chunk_id.clone(), result);
            }
        }
    }

    let mut merged: Vec<RetrievalResult> = best.into_values().collect();
    merged.sort_by(|a, b| {
        a.rank
            .cmp(&b.rank)
            .then(b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    for (i, r) in merged.iter_mut().enumerate() {
        r.rank = i + 1;
    }
    merged
}
