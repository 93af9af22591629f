//! Entity resolution: which entities does a query mention?

use aula_core::models::{Entity, EntityId};
use aula_core::text;

/// Ids of entities whose canonical name or an alias occurs in `query` as a
/// whole phrase, ignoring case and accents. Code-like forms ("MIA") must appear
/// as written. Longest matched form first.
pub(crate) fn resolve<'a>(
    entities: impl Iterator<Item = &'a Entity>,
    query: &str,
) -> Vec<EntityId> {
    let mut matches: Vec<(usize, &EntityId)> = entities
        .filter_map(|entity| {
            entity
                .surface_forms()
                .filter(|form| form.chars().count() >= 2 && text::mentions_form(query, form))
                .map(|form| form.chars().count())
                .max()
                .map(|len| (len, &entity.id))
        })
        .collect();

    matches.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    matches.into_iter().map(|(_, id)| id.clone()).collect()
}
