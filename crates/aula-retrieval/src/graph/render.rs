//! Plain-text rendering of graph evidence for the answer synthesizer.

use aula_core::models::{GraphPath, Relationship};
use aula_core::traits::IGraphStore;

fn name_of<'a>(store: &'a dyn IGraphStore, id: &'a str) -> &'a str {
    store.entity(id).map_or(id, |e| e.name.as_str())
}

/// `source --[relation]--> target`, using entity names.
pub fn relationship_line(store: &dyn IGraphStore, rel: &Relationship) -> String {
    format!(
        "{} --[{}]--> {}",
        name_of(store, &rel.source),
        rel.relation_type.as_str(),
        name_of(store, &rel.target)
    )
}

/// Edges of a path joined by ` | `.
pub fn path_line(store: &dyn IGraphStore, path: &GraphPath) -> String {
    path.relationships
        .iter()
        .map(|r| relationship_line(store, r))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Header line for an entity followed by its relationships among `relationships`.
pub fn entity_context(
    store: &dyn IGraphStore,
    entity_id: &str,
    relationships: &[Relationship],
) -> String {
    let header = match store.entity(entity_id) {
        Some(e) => format!("{} ({:?})", e.name, e.entity_type),
        None => entity_id.to_string(),
    };
    let lines: Vec<String> = relationships
        .iter()
        .filter(|r| r.source == entity_id || r.target == entity_id)
        .map(|r| relationship_line(store, r))
        .collect();
    if lines.is_empty() {
        header
    } else {
        format!("{header}: {}", lines.join("; "))
    }
}
