use aula_core::config::*;
use aula_core::QueryType;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = AulaConfig::from_toml("").unwrap();

    // Retrieval defaults
    assert_eq!(config.retrieval.top_k, 5);
    assert_eq!(config.retrieval.mode, RetrievalMode::Hybrid);
    assert!(config.retrieval.use_mmr);
    assert_eq!(config.retrieval.mmr_lambda, 0.5);
    assert_eq!(config.retrieval.overfetch_factor, 4);
    assert_eq!(config.retrieval.min_similarity, 0.3);

    // Graph defaults
    assert_eq!(config.graph.max_hops, 2);
    assert_eq!(config.graph.hop_decay, 0.7);
    assert_eq!(config.graph.same_community_bonus, 1.0);
    assert_eq!(config.graph.cross_community_penalty, 0.8);

    // Expansion defaults
    assert!(config.expansion.hyde_enabled);
    assert_eq!(config.expansion.hyde_alpha, 0.6);
    assert_eq!(config.expansion.paraphrase_count, 3);

    // Fusion defaults
    assert_eq!(config.fusion.rrf_k, 60);
    assert_eq!(
        config.fusion.weights_for(QueryType::Unclassified),
        SourceWeights::equal()
    );

    // Memory defaults
    assert_eq!(config.memory.window_size, 6);
    assert_eq!(config.memory.max_summary_chars, 500);

    // Verification defaults
    assert_eq!(config.verification.faithfulness_threshold, 0.75);
    assert_eq!(config.verification.entailment_threshold, 0.5);
    assert_eq!(config.verification.abstention_threshold, 0.65);
    assert!(config
        .verification
        .contacts
        .contains_key(contact_topics::DEFAULT));

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn factual_queries_favor_vector_and_comparative_favor_graph() {
    let fusion = FusionConfig::default();
    let factual = fusion.weights_for(QueryType::Factual);
    let comparative = fusion.weights_for(QueryType::Comparative);
    assert!(factual.vector > factual.graph);
    assert!(comparative.graph > comparative.vector);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[retrieval]
top_k = 8
mode = "vector_only"

[verification]
abstention_threshold = 0.7
"#;
    let config = AulaConfig::from_toml(toml).unwrap();
    assert_eq!(config.retrieval.top_k, 8);
    assert_eq!(config.retrieval.mode, RetrievalMode::VectorOnly);
    assert_eq!(config.verification.abstention_threshold, 0.7);
    // Non-overridden fields keep defaults
    assert_eq!(config.verification.faithfulness_threshold, 0.75);
    assert_eq!(config.fusion.rrf_k, 60);
}

#[test]
fn config_rejects_out_of_range_alpha() {
    let err = AulaConfig::from_toml("[expansion]\nhyde_alpha = 1.5\n").unwrap_err();
    assert!(err.to_string().contains("hyde_alpha"));
}

#[test]
fn config_rejects_zero_window() {
    let err = AulaConfig::from_toml("[memory]\nwindow_size = 0\n").unwrap_err();
    assert!(err.to_string().contains("window_size"));
}

#[test]
fn config_rejects_malformed_toml() {
    assert!(AulaConfig::from_toml("[retrieval\ntop_k = ").is_err());
}

#[test]
fn config_rejects_missing_default_contact() {
    let mut config = AulaConfig::default();
    config.verification.contacts.remove(contact_topics::DEFAULT);
    assert!(config.validate().is_err());
}

#[test]
fn config_from_missing_file_reports_path() {
    let err = AulaConfig::from_file("/nonexistent/aula.toml").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/aula.toml"));
}

#[test]
fn config_serde_roundtrip() {
    let config = AulaConfig::default();
    let toml_str = toml::to_string(&config).unwrap();
    let roundtripped = AulaConfig::from_toml(&toml_str).unwrap();
    assert_eq!(roundtripped.retrieval.top_k, config.retrieval.top_k);
    assert_eq!(
        roundtripped.verification.contacts,
        config.verification.contacts
    );
}
