//! Hypothetical Document Embedding (HyDE).
//!
//! A generator writes a plausible answer paragraph; its embedding is blended
//! with the raw query embedding.

use aula_core::constants::MAX_HYPOTHETICAL_CHARS;
use aula_core::text;

pub use aula_embeddings::math::blend;

/// Prompt for the hypothetical answer.
pub fn prompt(query: &str) -> String {
    format!(
        "Sos un asistente académico de posgrado. Escribí un párrafo breve que \
         responda la siguiente consulta como lo haría un reglamento o plan de \
         estudios, aunque no conozcas los datos exactos.\n\n\
         Consulta: {query}\n\n\
         Respuesta hipotética (un párrafo):"
    )
}

/// Trimmed hypothetical document, capped in length. `None` when empty.
pub fn clean(output: &str) -> Option<String> {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(text::truncate_chars(trimmed, MAX_HYPOTHETICAL_CHARS))
}
