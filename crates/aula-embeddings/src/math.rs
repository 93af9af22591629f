//! Vector math on `f32` embeddings. Similarities are returned as `f64`.

use aula_core::errors::{AulaResult, EmbeddingError};

/// Cosine similarity. Zero vectors and length mismatches score 0.0.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom <= f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Scale `v` to unit length in place. Zero vectors are left unchanged.
pub fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// `alpha·hyde + (1 − alpha)·query`, renormalized to unit length.
pub fn blend(hyde: &[f32], query: &[f32], alpha: f64) -> AulaResult<Vec<f32>> {
    if hyde.len() != query.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: query.len(),
            actual: hyde.len(),
        }
        .into());
    }
    let alpha = alpha.clamp(0.0, 1.0) as f32;
    let mut out: Vec<f32> = hyde
        .iter()
        .zip(query)
        .map(|(h, q)| alpha * h + (1.0 - alpha) * q)
        .collect();
    normalize(&mut out);
    Ok(out)
}
