//! Progressive summarization of turns that leave the window.

use aula_core::constants::MAX_FOLDED_TURN_CHARS;
use aula_core::models::Turn;
use aula_core::text;

/// Prefix of summaries built without a summarizer.
pub const HEURISTIC_PREFIX: &str = "Temas consultados: ";

/// Characters of a query kept in a heuristic summary entry.
const HEURISTIC_QUERY_CHARS: usize = 100;

/// A summary contribution for one folded turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Text returned by the external summarizer.
    Generated(String),
    /// The turn's query, kept when no summarizer answered.
    Heuristic(String),
}

impl Fragment {
    pub fn heuristic(turn: &Turn) -> Self {
        Self::Heuristic(text::truncate_chars(
            &text::normalize_whitespace(&turn.query),
            HEURISTIC_QUERY_CHARS,
        ))
    }

    /// A generated fragment, or the heuristic one when the summarizer returned nothing.
    pub fn generated_or_heuristic(summary: &str, turn: &Turn) -> Self {
        let summary = text::normalize_whitespace(summary);
        if summary.is_empty() {
            Self::heuristic(turn)
        } else {
            Self::Generated(summary)
        }
    }
}

/// Summarization prompt for one turn. Both sides are truncated.
pub fn prompt(turn: &Turn) -> String {
    format!(
        "Resumí brevemente la siguiente conversación entre un estudiante y el asistente de \
         posgrados del LSE-FIUBA. Enfocate en los temas consultados y las respuestas clave. \
         Máximo 3 oraciones.\n\nConversación:\nEstudiante: {}\nAsistente: {}\n\nResumen:",
        text::truncate_chars(&turn.query, MAX_FOLDED_TURN_CHARS),
        text::truncate_chars(&turn.answer, MAX_FOLDED_TURN_CHARS),
    )
}

/// Append `fragment` to `current`, keeping at most `max_chars` of the most recent text.
pub fn merge(current: &str, fragment: &Fragment, max_chars: usize) -> String {
    let merged = match fragment {
        Fragment::Generated(s) if current.is_empty() => s.clone(),
        Fragment::Generated(s) => format!("{current} {s}"),
        Fragment::Heuristic(q) if current.is_empty() => format!("{HEURISTIC_PREFIX}{q}"),
        Fragment::Heuristic(q) if current.starts_with(HEURISTIC_PREFIX) => {
            format!("{current}; {q}")
        }
        Fragment::Heuristic(q) => format!("{current} {HEURISTIC_PREFIX}{q}"),
    };
    text::tail_chars(&merged, max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_fragments_accumulate_under_one_prefix() {
        let a = Fragment::heuristic(&Turn::new("¿Cuánto dura la CEIA?", "8 bimestres"));
        let b = Fragment::heuristic(&Turn::new("¿Y la MIA?", "..."));
        let s = merge("", &a, 500);
        let s = merge(&s, &b, 500);
        assert_eq!(s, "Temas consultados: ¿Cuánto dura la CEIA?; ¿Y la MIA?");
    }

    #[test]
    fn generated_fragments_are_space_joined() {
        let s = merge(
            "Preguntó por la CEIA.",
            &Fragment::Generated("Luego por la MIA.".into()),
            500,
        );
        assert_eq!(s, "Preguntó por la CEIA. Luego por la MIA.");
    }

    #[test]
    fn cap_keeps_the_most_recent_text() {
        let s = merge(&"x".repeat(50), &Fragment::Generated("final".into()), 20);
        assert_eq!(s.chars().count(), 20);
        assert!(s.ends_with("final"));
    }

    #[test]
    fn empty_generated_summary_falls_back() {
        let turn = Turn::new("¿Hay examen final?", "Sí");
        assert_eq!(
            Fragment::generated_or_heuristic("   ", &turn),
            Fragment::Heuristic("¿Hay examen final?".into())
        );
    }

    #[test]
    fn prompt_truncates_long_answers() {
        let turn = Turn::new("q", "a".repeat(1_000));
        let p = prompt(&turn);
        assert!(p.contains(&"a".repeat(MAX_FOLDED_TURN_CHARS)));
        assert!(!p.contains(&"a".repeat(MAX_FOLDED_TURN_CHARS + 1)));
    }
}
