//! Topic extraction over a fixed table of programs and academic processes.

use aula_core::text;

/// A topic keyword. Stems match any word that starts with them; codes match
/// only as written, so "mía" never reads as MIA.
#[derive(Debug, Clone, Copy)]
enum Keyword {
    Code(&'static str),
    Phrase(&'static str),
    Stem(&'static str),
}

use Keyword::{Code, Phrase, Stem};

/// Topic label → keywords. Phrases and stems are folded.
const TOPIC_TABLE: &[(&str, &[Keyword])] = &[
    (
        "CEIA",
        &[Code("CEIA"), Phrase("especializacion en inteligencia artificial")],
    ),
    ("CESE", &[Code("CESE"), Phrase("sistemas embebidos")]),
    ("CEIoT", &[Code("CEIoT"), Phrase("internet de las cosas")]),
    (
        "MIA",
        &[
            Code("MIA"),
            Phrase("maestria en ia"),
            Phrase("maestria en inteligencia artificial"),
        ],
    ),
    ("MIAE", &[Code("MIAE")]),
    ("MIoT", &[Code("MIoT")]),
    ("MCB", &[Code("MCB"), Phrase("ciberseguridad")]),
    (
        "Reglamento",
        &[
            Phrase("reglamento"),
            Phrase("asistencia"),
            Phrase("nota minima"),
            Stem("bimestre"),
        ],
    ),
    ("Inscripción", &[Stem("inscripci"), Stem("inscribi"), Stem("matricul")]),
    ("Trabajo Final", &[Phrase("trabajo final"), Phrase("tesis"), Stem("ttf")]),
    ("GdP", &[Code("GdP"), Phrase("gestion de proyectos")]),
];

impl Keyword {
    fn matches(self, content: &str, folded: &str, words: &[String]) -> bool {
        match self {
            Code(c) => text::contains_code(content, c),
            Phrase(p) => text::contains_phrase(folded, p),
            Stem(s) => words.iter().any(|w| w.starts_with(s)),
        }
    }
}

/// Topic labels mentioned in `content`, in table order.
pub fn extract(content: &str) -> Vec<&'static str> {
    let folded = text::fold(content);
    let words = text::tokens(&folded);
    TOPIC_TABLE
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| k.matches(content, &folded, &words)))
        .map(|(label, _)| *label)
        .collect()
}

/// Whether `content` already names `topic`, by label or by any of its keywords.
pub fn mentions(content: &str, topic: &str) -> bool {
    if text::mentions_form(content, topic) {
        return true;
    }
    let folded = text::fold(content);
    let words = text::tokens(&folded);
    TOPIC_TABLE
        .iter()
        .find(|(label, _)| *label == topic)
        .is_some_and(|(_, keywords)| keywords.iter().any(|k| k.matches(content, &folded, &words)))
}
