use std::collections::{BTreeMap, BTreeSet};

use aula_core::models::*;

fn chunk(id: &str, programs: &[&str], doc_type: DocumentType) -> Chunk {
    Chunk::new(id, format!("texto de {id}"), "reglamento", "Art. 1", vec![1.0, 0.0]).with_metadata(
        ChunkMetadata {
            programs: programs.iter().map(|p| p.to_string()).collect(),
            doc_type,
        },
    )
}

#[test]
fn chunk_hash_is_blake3_of_text() {
    let c = chunk("c1", &[], DocumentType::Regulation);
    assert_eq!(c.content_hash.len(), 64);
    assert!(c.hash_matches());
}

#[test]
fn metadata_filter_matches_programs_case_insensitively() {
    let c = chunk("c1", &["CEIA"], DocumentType::Program);
    let filter = MetadataFilter {
        programs: vec!["ceia".into()],
        ..Default::default()
    };
    assert!(filter.matches(&c));

    let other = MetadataFilter {
        programs: vec!["MIA".into()],
        ..Default::default()
    };
    assert!(!other.matches(&c));
    assert!(MetadataFilter::default().matches(&c));
}

#[test]
fn evidence_markers_are_one_based() {
    let item = |id: &str| EvidenceItem {
        chunk: chunk(id, &[], DocumentType::Other),
        fused_score: 0.1,
        provenance: BTreeSet::from([Provenance::Vector]),
        source_scores: BTreeMap::from([(Provenance::Vector, 0.8)]),
        source_ranks: BTreeMap::from([(Provenance::Vector, 1)]),
        graph_context: None,
    };
    let evidence = FusedEvidence::new(vec![item("a"), item("b")]);
    assert_eq!(evidence.by_marker(1).unwrap().chunk.id, "a");
    assert_eq!(evidence.by_marker(2).unwrap().chunk.id, "b");
    assert!(evidence.by_marker(0).is_none());
    assert!(evidence.by_marker(3).is_none());
    assert_eq!(evidence.best_vector_score(), Some(0.8));
}

#[test]
fn relationship_weight_defaults_to_one() {
    let rel = Relationship {
        id: "r1".into(),
        source: "a".into(),
        target: "b".into(),
        relation_type: RelationType::BelongsTo,
        source_chunks: BTreeSet::new(),
        weight: None,
    };
    assert_eq!(rel.effective_weight(), 1.0);
    assert_eq!(rel.other_end("b").map(String::as_str), Some("a"));
    assert!(rel.other_end("z").is_none());
}

#[test]
fn abstention_reasons_serialize_snake_case() {
    let json = serde_json::to_string(&AbstentionReason::NoEvidence).unwrap();
    assert_eq!(json, "\"no_evidence\"");
    assert_eq!(AbstentionReason::OutOfDomain.to_string(), "out_of_domain");
}

#[test]
fn response_omits_contacts_when_absent() {
    let response = AnswerResponse {
        status: ResponseStatus::Approved,
        text: "La asistencia mínima es del 75% [1].".into(),
        citations: vec![],
        confidence: 0.9,
        conflicts: 0,
        contacts: None,
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "approved");
    assert!(json.get("contacts").is_none());
}

#[test]
fn first_failing_layer_maps_to_reason() {
    assert_eq!(
        VerificationLayer::CrossReference.failure_reason(),
        Some(AbstentionReason::Contradiction)
    );
    assert_eq!(VerificationLayer::FallbackSuggestion.failure_reason(), None);
}

// ── Properties ──

proptest::proptest! {
    #[test]
    fn check_signal_is_always_clamped(signal in -10.0f64..10.0, passed in proptest::bool::ANY) {
        let check = CheckResult::new(VerificationLayer::ConfidenceGate, passed, signal, "");
        proptest::prop_assert!((0.0..=1.0).contains(&check.signal));
        proptest::prop_assert_eq!(check.passed, passed);
    }
}
