//! Keyword-based query-type classification.

use aula_core::text;
use aula_core::QueryType;

/// Prices, opinions, and other institutions are outside the corpus.
const OUT_OF_DOMAIN: &[&str] = &[
    "precio",
    "costo",
    "cuesta",
    "cuanto sale",
    "cuanto cuesta",
    "arancel",
    "opinion",
    "opinas",
    "pensas",
    "recomendas",
    "otra universidad",
    "otra facultad",
];

/// Relational and multi-hop cues: prerequisites, paths, comparisons.
const COMPARATIVE: &[&str] = &[
    "requisito",
    "requisitos",
    "necesito para",
    "correlativa",
    "correlativas",
    "prerrequisito",
    "camino",
    "desde",
    "hasta",
    "pasos para",
    "antes de",
    "despues de",
    "primero",
    "diferencia",
    "diferencias",
    "comparar",
    "comparacion",
    "versus",
    "vs",
    "relacion entre",
    "ambas",
    "ambos",
];

const PROCEDURAL: &[&str] = &[
    "como",
    "tramite",
    "procedimiento",
    "proceso",
    "que tengo que hacer",
    "que hago",
    "solicitar",
    "presentar",
    "inscribirme",
    "anotarme",
];

const FACTUAL: &[&str] = &[
    "que es",
    "cual",
    "cuales",
    "cuanto",
    "cuantos",
    "cuantas",
    "cuando",
    "donde",
    "quien",
    "plazo",
    "duracion",
    "porcentaje",
    "asistencia",
    "fecha",
];

fn mentions_any(query: &str, cues: &[&str]) -> bool {
    cues.iter().any(|cue| text::contains_phrase(query, cue))
}

/// Out-of-domain cues win, then relational, procedural, and factual ones.
pub fn classify(query: &str) -> QueryType {
    if mentions_any(query, OUT_OF_DOMAIN) {
        QueryType::OutOfDomain
    } else if mentions_any(query, COMPARATIVE) {
        QueryType::Comparative
    } else if mentions_any(query, PROCEDURAL) {
        QueryType::Procedural
    } else if mentions_any(query, FACTUAL) {
        QueryType::Factual
    } else {
        QueryType::Unclassified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_representative_queries() {
        assert_eq!(classify("¿Cuál es la asistencia mínima?"), QueryType::Factual);
        assert_eq!(
            classify("¿Qué requisitos necesito para la MIA?"),
            QueryType::Comparative
        );
        assert_eq!(
            classify("¿Cómo presento el trabajo final?"),
            QueryType::Procedural
        );
        assert_eq!(classify("¿Cuánto cuesta la carrera?"), QueryType::OutOfDomain);
        assert_eq!(classify("hola"), QueryType::Unclassified);
    }

    #[test]
    fn out_of_domain_overrides_other_cues() {
        assert_eq!(
            classify("¿Cuál es el precio de la inscripción?"),
            QueryType::OutOfDomain
        );
    }
}
