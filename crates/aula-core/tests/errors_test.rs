use aula_core::errors::*;

#[test]
fn embedding_dimension_mismatch_carries_values() {
    let err = EmbeddingError::DimensionMismatch {
        expected: 384,
        actual: 128,
    };
    let msg = err.to_string();
    assert!(msg.contains("384"));
    assert!(msg.contains("128"));
}

#[test]
fn subsystem_errors_convert_into_aula_error() {
    let err: AulaError = GraphError::EntityNotFound {
        entity_id: "prog-ceia".into(),
    }
    .into();
    assert!(matches!(err, AulaError::GraphError(_)));
    assert!(err.to_string().contains("prog-ceia"));

    let err: AulaError = SessionError::MalformedSession {
        reason: "empty".into(),
    }
    .into();
    assert!(matches!(err, AulaError::SessionError(_)));
}

#[test]
fn degraded_mode_carries_component_and_fallback() {
    let err = AulaError::DegradedMode {
        component: "hyde".into(),
        fallback: "raw_query_embedding".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("hyde"));
    assert!(msg.contains("raw_query_embedding"));
}

#[test]
fn serde_json_errors_convert() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let err: AulaError = parse.unwrap_err().into();
    assert!(matches!(err, AulaError::SerializationError(_)));
}

#[test]
fn timeout_reports_millis() {
    let err = AulaError::Timeout { millis: 2500 };
    assert!(err.to_string().contains("2500"));
}
