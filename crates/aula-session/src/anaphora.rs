//! Lexical anaphora detection and topic substitution.

use std::sync::LazyLock;

use aula_core::text;
use regex::Regex;

/// Demonstratives, continuations, and "what about" openers, matched on folded text.
static INDICATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(eso|esto|esa|ese|este|esta|estos|estas|la misma|el mismo|lo mismo|tambien|ademas|y la|y el|y los|que mas|algo mas|otra cosa|y sobre|y con respecto|y en cuanto)\b",
    )
    .expect("valid indicator regex")
});

/// Neuter demonstratives that stand for a whole topic and can be replaced by it.
static NEUTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(eso|esto)\b").expect("valid neuter regex"));

/// Whether `query` leans on earlier turns to be understood.
pub fn has_anaphora(query: &str) -> bool {
    INDICATORS.is_match(&text::fold(query))
}

/// Make `query` self-contained by pointing it at `topic`.
///
/// A neuter demonstrative ("eso", "esto") is replaced by the topic; any other
/// reference keeps the query and appends the topic as context.
pub fn resolve(query: &str, topic: &str) -> String {
    let query = query.trim();
    if NEUTER.is_match(query) {
        return NEUTER.replace(query, topic).into_owned();
    }
    format!("{query} (en relación a {topic})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuations_are_anaphoric() {
        assert!(has_anaphora("¿Y la duración?"));
        assert!(has_anaphora("¿Qué más necesito?"));
        assert!(has_anaphora("¿Eso también aplica?"));
        assert!(has_anaphora("¿Y con respecto a las fechas?"));
    }

    #[test]
    fn self_contained_queries_are_not() {
        assert!(!has_anaphora("¿Cuál es la asistencia mínima?"));
        assert!(!has_anaphora("¿Cuántos bimestres dura la CEIA?"));
        // Word boundaries: "estado" is not "esta".
        assert!(!has_anaphora("¿Cómo consulto el estado de mi trámite?"));
    }

    #[test]
    fn neuter_demonstrative_is_substituted() {
        assert_eq!(resolve("¿Cuánto dura eso?", "CEIA"), "¿Cuánto dura CEIA?");
        assert_eq!(
            resolve("Esto es obligatorio?", "Trabajo Final"),
            "Trabajo Final es obligatorio?"
        );
    }

    #[test]
    fn other_references_append_the_topic() {
        assert_eq!(resolve("¿Y la duración?", "MIA"), "¿Y la duración? (en relación a MIA)");
    }
}
