//! Deterministic domain synonym substitution.
//!
//! E.g., "requisitos de inscripción" → "condiciones de inscripción".

use aula_core::text;

/// Academic-domain synonyms, in priority order. Keys are accent-folded.
const DOMAIN_SYNONYMS: &[(&str, &[&str])] = &[
    ("requisito", &["condicion", "exigencia"]),
    ("inscripcion", &["matriculacion", "admision"]),
    ("materia", &["asignatura", "curso"]),
    ("plazo", &["fecha limite", "vencimiento"]),
    ("asistencia", &["presencialidad", "concurrencia"]),
    ("correlativa", &["prerrequisito", "materia previa"]),
    ("carrera", &["programa", "posgrado"]),
    ("titulo", &["diploma", "grado"]),
    ("nota", &["calificacion", "puntaje"]),
    ("regularidad", &["condicion de alumno regular"]),
    ("cuatrimestre", &["semestre"]),
    ("bimestre", &["periodo de dos meses"]),
    ("cursada", &["dictado", "clases"]),
    ("tesis", &["trabajo final"]),
    ("arancel", &["cuota"]),
];

fn synonym_for(word: &str) -> Option<&'static str> {
    let folded = text::fold(word);
    DOMAIN_SYNONYMS.iter().find_map(|(key, syns)| {
        let plural_s = format!("{key}s");
        let plural_es = format!("{key}es");
        (folded == *key || folded == plural_s || folded == plural_es).then(|| syns[0])
    })
}

/// Replace the first domain term of `query` with its first synonym.
/// `None` when the query has no domain term.
pub fn expand(query: &str) -> Option<String> {
    let mut replaced = false;
    let words: Vec<String> = query
        .split_whitespace()
        .map(|token| {
            if replaced {
                return token.to_string();
            }
            let start = token.find(|c: char| c.is_alphanumeric());
            let end = token.rfind(|c: char| c.is_alphanumeric());
            let (Some(start), Some(end)) = (start, end) else {
                return token.to_string();
            };
            let end = end + token[end..].chars().next().map_or(1, char::len_utf8);
            match synonym_for(&token[start..end]) {
                Some(syn) => {
                    replaced = true;
                    format!("{}{}{}", &token[..start], syn, &token[end..])
                }
                None => token.to_string(),
            }
        })
        .collect();

    replaced.then(|| words.join(" "))
}
