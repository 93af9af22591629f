//! Rendering verdicts into the public response shape.
//!
//! Approved answers keep the draft, with chunk-id markers renumbered to
//! evidence positions, followed by a `Fuentes:` footer. Abstentions replace the
//! draft with a fixed message per reason and the suggested contacts.

use std::sync::LazyLock;

use aula_core::models::{
    AbstentionReason, AnswerResponse, Citation, ResponseStatus, VerificationVerdict,
};
use regex::{Captures, Regex};

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]+)\]").expect("valid marker regex"));

pub const SOURCES_HEADER: &str = "Fuentes:";
pub const CONTACTS_PREFIX: &str = "Podés consultar a: ";

pub fn abstention_message(reason: AbstentionReason) -> &'static str {
    match reason {
        AbstentionReason::NoEvidence => {
            "No encontré información sobre tu consulta en la documentación disponible."
        }
        AbstentionReason::OutOfDomain => {
            "Tu consulta está fuera del alcance de la documentación académica del posgrado."
        }
        AbstentionReason::Contradiction => {
            "Encontré información contradictoria entre las fuentes, así que prefiero no responder hasta que se revise."
        }
        AbstentionReason::LowFaithfulness
        | AbstentionReason::EntailmentFailed
        | AbstentionReason::UnverifiedFacts
        | AbstentionReason::LowConfidence
        | AbstentionReason::UncitedSentence => {
            "No pude verificar una respuesta con suficiente certeza contra la documentación."
        }
        AbstentionReason::SynthesisFailed => "No pude elaborar una respuesta en este momento.",
        AbstentionReason::Timeout => "La consulta tardó demasiado y se canceló.",
    }
}

/// Replace `[chunk-id]` markers with the `[n]` of their citation.
pub fn renumber_markers(draft: &str, citations: &[Citation]) -> String {
    MARKER
        .replace_all(draft, |caps: &Captures<'_>| {
            let inner = caps[1].trim();
            match citations.iter().find(|c| c.chunk_id == inner) {
                Some(c) => format!("[{}]", c.marker),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Numbered source list, one line per citation.
pub fn sources_footer(citations: &[Citation]) -> String {
    let mut sorted: Vec<&Citation> = citations.iter().collect();
    sorted.sort_by_key(|c| c.marker);
    let mut out = String::from(SOURCES_HEADER);
    for c in sorted {
        out.push_str(&format!("\n[{}] {}, {}", c.marker, c.document_id, c.section));
    }
    out
}

fn abstention_text(reason: AbstentionReason, contacts: &[String]) -> String {
    let message = abstention_message(reason);
    if contacts.is_empty() {
        message.to_string()
    } else {
        format!("{message}\n{CONTACTS_PREFIX}{}", contacts.join(", "))
    }
}

/// The public response for a settled verdict.
pub fn render(draft: Option<&str>, verdict: &VerificationVerdict) -> AnswerResponse {
    match (verdict.approved, draft) {
        (true, Some(draft)) => {
            let body = renumber_markers(draft.trim(), &verdict.citations);
            AnswerResponse {
                status: ResponseStatus::Approved,
                text: format!("{body}\n\n{}", sources_footer(&verdict.citations)),
                citations: verdict.citations.clone(),
                confidence: verdict.confidence,
                conflicts: verdict.conflict_count,
                contacts: None,
            }
        }
        _ => {
            let reason = verdict.reason.unwrap_or(AbstentionReason::LowConfidence);
            AnswerResponse {
                status: ResponseStatus::Abstained,
                text: abstention_text(reason, &verdict.contacts),
                citations: Vec::new(),
                confidence: verdict.confidence,
                conflicts: verdict.conflict_count,
                contacts: (!verdict.contacts.is_empty()).then(|| verdict.contacts.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn citation(marker: usize, chunk_id: &str) -> Citation {
        Citation {
            marker,
            chunk_id: chunk_id.into(),
            document_id: format!("doc-{chunk_id}"),
            section: "Sección".into(),
        }
    }

    #[test]
    fn chunk_id_markers_become_positions() {
        let citations = vec![citation(2, "ceia-duracion")];
        assert_eq!(
            renumber_markers("Dura 8 bimestres [ceia-duracion]. Otra [9].", &citations),
            "Dura 8 bimestres [2]. Otra [9]."
        );
    }

    #[test]
    fn footer_lists_sources_in_marker_order() {
        let footer = sources_footer(&[citation(2, "b"), citation(1, "a")]);
        assert_eq!(footer, "Fuentes:\n[1] doc-a, Sección\n[2] doc-b, Sección");
    }

    #[test]
    fn every_reason_has_a_message() {
        for reason in [
            AbstentionReason::NoEvidence,
            AbstentionReason::OutOfDomain,
            AbstentionReason::Contradiction,
            AbstentionReason::UncitedSentence,
            AbstentionReason::SynthesisFailed,
            AbstentionReason::Timeout,
        ] {
            assert!(!abstention_message(reason).is_empty());
        }
    }
}
