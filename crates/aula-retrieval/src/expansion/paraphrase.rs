//! Generated paraphrases of the query.

use std::sync::LazyLock;

use aula_core::text;
use regex::Regex;

static NUMBERING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+[\.\)\-]\s*").unwrap());

pub fn prompt(query: &str, count: usize) -> String {
    format!(
        "Reformulá la siguiente consulta académica de {count} formas distintas, \
         conservando su significado. Escribí una reformulación por línea, \
         numeradas.\n\nConsulta: {query}\n\nReformulaciones:"
    )
}

/// Up to `count` paraphrases from a numbered-list completion. Lines of ten
/// characters or fewer and lines equal to the query are dropped.
pub fn parse(output: &str, query: &str, count: usize) -> Vec<String> {
    let query_key = text::fold(&text::normalize_whitespace(query));
    let mut seen = Vec::new();
    let mut out = Vec::new();
    for line in output.lines() {
        let cleaned = NUMBERING.replace(line, "");
        let cleaned = cleaned.trim().trim_matches('"').trim();
        if cleaned.chars().count() <= 10 {
            continue;
        }
        let key = text::fold(&text::normalize_whitespace(cleaned));
        if key == query_key || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(cleaned.to_string());
        if out.len() >= count {
            break;
        }
    }
    out
}
