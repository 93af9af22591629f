//! Cross-reference consistency between vector- and graph-sourced evidence.
//!
//! Each evidence sentence that pairs a known attribute with a value yields a
//! fact `(subject, attribute, value)`. The subject is the first program code
//! in the sentence, else the chunk's first tagged program, else `general`.
//! Facts from different chunks on opposite sides that share subject and
//! attribute but disagree on value are conflicts.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use aula_core::models::{
    CheckResult, Conflict, EvidenceItem, FusedEvidence, Provenance, VerificationLayer,
};
use aula_core::text;
use regex::Regex;
use tracing::debug;

static PROGRAM: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r"\b(CEIA|CESE|CEIoT|MIA|MIAE|MIoT|MCB)\b").expect("valid program regex")
    });

/// Value patterns on folded text, most specific first.
static VALUES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d+(?:[.,]\d+)?\s*(?:%|por\s*ciento)",
        r"\d+\s*(?:bimestres?|meses|mes|anos?|dias?|semanas?|horas?|puntos?)\b",
        r"\b\d+(?:[.,]\d+)?\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid value regex"))
    .collect()
});

/// Attribute → folded cue stems. First match wins.
const ATTRIBUTES: &[(&str, &[&str])] = &[
    ("asistencia", &["asistencia"]),
    ("nota", &["nota", "calificacion"]),
    ("duracion", &["bimestre", "duracion", "dura "]),
    ("plazo", &["plazo", "cierra", "vence"]),
];

/// A subject–attribute–value assertion found in one evidence chunk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fact {
    pub subject: String,
    pub attribute: &'static str,
    pub value: String,
    pub chunk_id: String,
}

fn canonical_value(raw: &str) -> String {
    raw.replace("por ciento", "%")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn attribute_of(folded_sentence: &str) -> Option<&'static str> {
    ATTRIBUTES
        .iter()
        .find(|(_, cues)| cues.iter().any(|c| folded_sentence.contains(c)))
        .map(|(attribute, _)| *attribute)
}

fn value_of(folded_sentence: &str) -> Option<String> {
    VALUES
        .iter()
        .find_map(|re| re.find(folded_sentence))
        .map(|m| canonical_value(m.as_str()))
}

/// Facts asserted by one evidence chunk.
pub fn facts(item: &EvidenceItem) -> Vec<Fact> {
    let chunk = &item.chunk;
    let default_subject = chunk
        .metadata
        .programs
        .first()
        .map(|p| p.to_uppercase())
        .unwrap_or_else(|| "general".to_string());

    text::split_sentences(&chunk.text)
        .iter()
        .filter_map(|sentence| {
            let folded = text::fold(sentence);
            let attribute = attribute_of(&folded)?;
            let value = value_of(&folded)?;
            let subject = PROGRAM
                .find(sentence)
                .map(|m| m.as_str().to_uppercase())
                .unwrap_or_else(|| default_subject.clone());
            Some(Fact {
                subject,
                attribute,
                value,
                chunk_id: chunk.id.clone(),
            })
        })
        .collect()
}

fn side(evidence: &FusedEvidence, provenance: Provenance) -> Vec<Fact> {
    evidence
        .iter()
        .filter(|i| i.has(provenance))
        .flat_map(facts)
        .collect()
}

/// Conflicting fact pairs between the vector and graph sides.
pub fn find_conflicts(evidence: &FusedEvidence) -> Vec<Conflict> {
    let vector = side(evidence, Provenance::Vector);
    let graph = side(evidence, Provenance::Graph);

    let mut seen = BTreeSet::new();
    let mut conflicts = Vec::new();
    for v in &vector {
        for g in &graph {
            if v.chunk_id == g.chunk_id
                || v.subject != g.subject
                || v.attribute != g.attribute
                || v.value == g.value
            {
                continue;
            }
            let key = (v.subject.clone(), v.attribute, v.chunk_id.clone(), g.chunk_id.clone());
            if seen.insert(key) {
                conflicts.push(Conflict {
                    subject: v.subject.clone(),
                    attribute: v.attribute.to_string(),
                    vector_value: v.value.clone(),
                    graph_value: g.value.clone(),
                    vector_chunk: v.chunk_id.clone(),
                    graph_chunk: g.chunk_id.clone(),
                });
            }
        }
    }
    conflicts
}

/// Fails on any conflict. When one side is missing there is nothing to
/// compare and the layer passes with the `neutral` signal.
pub fn check(evidence: &FusedEvidence, neutral: f64) -> (CheckResult, Vec<Conflict>) {
    let layer = VerificationLayer::CrossReference;
    let has_vector = evidence.iter().any(|i| i.has(Provenance::Vector));
    let has_graph = evidence.iter().any(|i| i.has(Provenance::Graph));
    if !has_vector || !has_graph {
        return (
            CheckResult::new(layer, true, neutral, "single retrieval source"),
            Vec::new(),
        );
    }

    let conflicts = find_conflicts(evidence);
    if conflicts.is_empty() {
        (CheckResult::new(layer, true, 1.0, "sources agree"), conflicts)
    } else {
        debug!(conflicts = conflicts.len(), "cross-reference conflicts");
        let detail = conflicts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        (CheckResult::new(layer, false, 0.0, detail), conflicts)
    }
}
