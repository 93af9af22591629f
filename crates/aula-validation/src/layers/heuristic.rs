//! Heuristic verification: checkable tokens of the draft must appear literally
//! in the evidence, whatever the embedding similarity says.

use std::sync::LazyLock;

use aula_core::models::{CheckResult, FusedEvidence, VerificationLayer};
use aula_core::text;
use regex::Regex;

use crate::claims;

/// Matched on folded text.
static NUMERIC: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Percentages.
        r"\d+(?:[.,]\d+)?\s*(?:%|por\s*ciento)",
        // Quantities with a unit.
        r"\d+\s*(?:bimestres?|meses|mes|anos?|dias?|semanas?|horas?|puntos?|creditos?|clases?)\b",
        // Articles of a regulation.
        r"\bart(?:iculo|\.)?\s*\d+",
        // Dates.
        r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b",
        r"\b\d{1,2}\s+de\s+(?:enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|setiembre|octubre|noviembre|diciembre)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid numeric token regex"))
    .collect()
});

/// Any other number, checked on its own once the specific patterns have run.
static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+(?:[.,]\d+)?\b").expect("valid number regex"));

/// Matched on the original text; lowercase "mía" must not read as a code.
static NAMED: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(?:CEIA|CESE|CEIoT|MIA|MIAE|MIoT|MCB)\b",
        r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid named token regex"))
    .collect()
});

/// A token the draft asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactToken {
    /// Compared without whitespace, on digit boundaries.
    Numeric(String),
    /// Compared as a phrase.
    Named(String),
}

impl FactToken {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Numeric(s) | Self::Named(s) => s,
        }
    }
}

/// Folded, whitespace-free form used for numeric comparison.
fn canonical(s: &str) -> String {
    text::fold(s)
        .replace("por ciento", "%")
        .replace("porciento", "%")
        .replace("articulo", "art")
        .replace("art.", "art")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Checkable tokens of `draft`, markers ignored, without duplicates.
pub fn extract_tokens(draft: &str) -> Vec<FactToken> {
    let plain = claims::plain_text(draft);
    let folded = text::fold(&plain);
    let mut tokens: Vec<FactToken> = Vec::new();
    let mut push = |t: FactToken| {
        if !tokens.contains(&t) {
            tokens.push(t);
        }
    };
    let mut covered: Vec<(usize, usize)> = Vec::new();
    for re in NUMERIC.iter() {
        for m in re.find_iter(&folded) {
            covered.push((m.start(), m.end()));
            push(FactToken::Numeric(canonical(m.as_str())));
        }
    }
    for m in BARE_NUMBER.find_iter(&folded) {
        if !covered.iter().any(|&(s, e)| m.start() < e && s < m.end()) {
            push(FactToken::Numeric(canonical(m.as_str())));
        }
    }
    for re in NAMED.iter() {
        for m in re.find_iter(&plain) {
            push(FactToken::Named(m.as_str().trim_end_matches('.').to_string()));
        }
    }
    tokens
}

/// Whether `needle` occurs in `haystack` without extending a number on either side.
fn contains_on_digit_boundary(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(i, _)| {
        let before_ok = !haystack[..i]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_digit());
        let ends_with_digit = needle.chars().next_back().is_some_and(|c| c.is_ascii_digit());
        let after_ok = !ends_with_digit
            || !haystack[i + needle.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit());
        before_ok && after_ok
    })
}

/// Whether `token` appears in `evidence_text`.
pub fn is_supported(token: &FactToken, evidence_text: &str) -> bool {
    match token {
        FactToken::Numeric(t) => contains_on_digit_boundary(&canonical(evidence_text), t),
        FactToken::Named(t) => text::contains_phrase(evidence_text, t),
    }
}

/// Every token must be found in the evidence. No tokens passes with full signal.
pub fn check(draft: &str, evidence: &FusedEvidence) -> CheckResult {
    let layer = VerificationLayer::HeuristicVerification;
    let tokens = extract_tokens(draft);
    if tokens.is_empty() {
        return CheckResult::new(layer, true, 1.0, "no checkable tokens");
    }

    let evidence_text = evidence
        .iter()
        .map(|i| i.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let missing: Vec<&str> = tokens
        .iter()
        .filter(|t| !is_supported(t, &evidence_text))
        .map(FactToken::as_str)
        .collect();

    let verified = tokens.len() - missing.len();
    let signal = verified as f64 / tokens.len() as f64;
    let detail = if missing.is_empty() {
        format!("{verified} tokens verified")
    } else {
        format!("not in evidence: {}", missing.join(", "))
    };
    CheckResult::new(layer, missing.is_empty(), signal, detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_percentages_codes_and_emails() {
        let tokens =
            extract_tokens("La CEIA exige 75 % de asistencia [1]. Escribí a tesis.lse@fi.uba.ar.");
        assert!(tokens.contains(&FactToken::Numeric("75%".into())));
        assert!(tokens.contains(&FactToken::Named("CEIA".into())));
        assert!(tokens.contains(&FactToken::Named("tesis.lse@fi.uba.ar".into())));
        // Citation markers are not numbers.
        assert!(!tokens.iter().any(|t| t.as_str() == "1"));
    }

    #[test]
    fn numbers_match_on_digit_boundaries() {
        let token = FactToken::Numeric("5%".into());
        assert!(!is_supported(&token, "La asistencia mínima es del 75%."));
        assert!(is_supported(&token, "Un recargo del 5 por ciento."));
    }

    #[test]
    fn quantities_ignore_spacing_and_accents() {
        let tokens = extract_tokens("Son 12 meses.");
        assert!(is_supported(&tokens[0], "dentro de los 12  meses posteriores"));
        assert!(!is_supported(&tokens[0], "dentro de los 120 meses"));
    }

    #[test]
    fn bare_numbers_are_checked_too() {
        let tokens = extract_tokens("Son 12 asignaturas desde 2019 [1].");
        assert!(tokens.contains(&FactToken::Numeric("12".into())));
        assert!(tokens.contains(&FactToken::Numeric("2019".into())));
        assert!(!tokens.iter().any(|t| t.as_str() == "1"));
        assert!(!is_supported(&tokens[0], "Son 120 asignaturas desde 2019."));
    }

    #[test]
    fn numbers_inside_specific_tokens_are_not_repeated() {
        let tokens = extract_tokens("Dura 8 bimestres y exige 75% de asistencia.");
        assert_eq!(
            tokens,
            vec![FactToken::Numeric("75%".into()), FactToken::Numeric("8bimestres".into())]
        );
    }

    #[test]
    fn lowercase_possessive_is_not_a_program_code() {
        assert!(extract_tokens("La duda es mía y la respuesta también.").is_empty());
    }
}
