//! Maximal Marginal Relevance selection.
//!
//! Each step picks the candidate maximizing
//! `relevance − λ · max(sim(candidate, selected))`.

use aula_embeddings::math;

/// A candidate for MMR selection.
#[derive(Debug, Clone, Copy)]
pub struct MmrCandidate<'a> {
    pub embedding: &'a [f32],
    /// Similarity to the query.
    pub relevance: f64,
}

/// Indices of up to `k` selected candidates, in selection order.
///
/// `lambda` is the redundancy penalty: 0.0 reduces to pure relevance ranking.
/// Ties go to the earlier candidate.
pub fn select(candidates: &[MmrCandidate<'_>], k: usize, lambda: f64) -> Vec<usize> {
    let k = k.min(candidates.len());
    let mut selected: Vec<usize> = Vec::with_capacity(k);
    let mut remaining: Vec<usize> = (0..candidates.len()).collect();
    // Max similarity of each candidate to anything selected so far.
    let mut redundancy = vec![0.0f64; candidates.len()];

    while selected.len() < k {
        let mut best: Option<(usize, f64)> = None;
        for (slot, &i) in remaining.iter().enumerate() {
            let score = if selected.is_empty() {
                candidates[i].relevance
            } else {
                candidates[i].relevance - lambda * redundancy[i]
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((slot, score));
            }
        }
        let Some((slot, _)) = best else { break };
        let chosen = remaining.remove(slot);
        selected.push(chosen);

        for &i in &remaining {
            let sim = math::cosine(candidates[i].embedding, candidates[chosen].embedding);
            if sim > redundancy[i] {
                redundancy[i] = sim;
            }
        }
    }
    selected
}
