/// Knowledge-graph errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("entity not found: {entity_id}")]
    EntityNotFound { entity_id: String },

    #[error("duplicate entity: {entity_id}")]
    DuplicateEntity { entity_id: String },

    #[error("relationship {relationship_id} references missing entity {entity_id}")]
    DanglingRelationship {
        relationship_id: String,
        entity_id: String,
    },

    #[error("hop limit {requested} exceeds maximum {max}")]
    HopLimitExceeded { requested: usize, max: usize },
}
