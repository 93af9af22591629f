//! Citation enforcement: every sentence of the draft, short ones included,
//! must cite an entry of the fused evidence, by position (`[2]`) or by chunk
//! id (`[ceia-duracion]`).

use aula_core::models::{CheckResult, Citation, FusedEvidence, VerificationLayer};

use crate::claims::Claim;

/// Evidence position (0-based) a marker points at.
fn resolve_marker(marker: &str, evidence: &FusedEvidence) -> Option<usize> {
    match marker.parse::<usize>() {
        Ok(n) => evidence.by_marker(n).map(|_| n - 1),
        Err(_) => evidence.position_of(marker),
    }
}

/// Check every sentence and collect the citations, one per cited chunk in order
/// of first use. Markers are renumbered to evidence positions.
pub fn check(sentences: &[Claim], evidence: &FusedEvidence) -> (CheckResult, Vec<Citation>) {
    let layer = VerificationLayer::CitationEnforcement;
    if sentences.is_empty() {
        return (CheckResult::new(layer, false, 0.0, "no sentences to cite"), Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut uncited = 0usize;
    for sentence in sentences {
        let resolved: Vec<usize> = sentence
            .markers
            .iter()
            .filter_map(|m| resolve_marker(m, evidence))
            .collect();
        if resolved.is_empty() {
            uncited += 1;
        }
        for p in resolved {
            if !positions.contains(&p) {
                positions.push(p);
            }
        }
    }

    let citations = positions
        .into_iter()
        .filter_map(|p| {
            evidence.items.get(p).map(|item| Citation {
                marker: p + 1,
                chunk_id: item.chunk.id.clone(),
                document_id: item.chunk.document_id.clone(),
                section: item.chunk.section.clone(),
            })
        })
        .collect();

    let cited = sentences.len() - uncited;
    let signal = cited as f64 / sentences.len() as f64;
    let detail = format!("{cited}/{} sentences cited", sentences.len());
    (CheckResult::new(layer, uncited == 0, signal, detail), citations)
}
