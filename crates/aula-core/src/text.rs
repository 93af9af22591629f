//! Text normalization helpers shared by matching code across the workspace.

/// Lowercase and strip Spanish diacritics so "Inscripción" matches "inscripcion".
pub fn fold(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Alphanumeric tokens of the folded text.
pub fn tokens(text: &str) -> Vec<String> {
    fold(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether `phrase` occurs in `haystack` on word boundaries, ignoring case and accents.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    let phrase = fold(phrase.trim());
    contains_bounded(&fold(haystack), &phrase)
}

/// Whether `form` reads as a program code ("CEIA", "MIoT", "GdP"): a single
/// short word with at least two capitals.
pub fn is_code(form: &str) -> bool {
    let form = form.trim();
    form.chars().count() <= 6
        && form.chars().all(char::is_alphanumeric)
        && form.chars().filter(|c| c.is_uppercase()).count() >= 2
}

/// Case- and accent-sensitive whole-word match, so the code "MIA" is not
/// found in "la duda es mía".
pub fn contains_code(haystack: &str, code: &str) -> bool {
    contains_bounded(haystack, code.trim())
}

/// [`contains_code`] for code-like forms, [`contains_phrase`] otherwise.
pub fn mentions_form(haystack: &str, form: &str) -> bool {
    if is_code(form) {
        contains_code(haystack, form)
    } else {
        contains_phrase(haystack, form)
    }
}

fn contains_bounded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = begin + haystack[begin..].chars().next().map_or(1, char::len_utf8);
    }
    false
}

/// Split text into sentences on `.`, `!`, `?` followed by whitespace or end of text.
///
/// Decimal points and common abbreviations ("Art.", "Res.") never split.
/// Newlines always do.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                Some(next) if next.is_whitespace() && !ends_with_abbreviation(&current) => {
                    push_trimmed(&mut sentences, &current);
                    current.clear();
                }
                _ => {}
            }
        } else if c == '\n' {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);
    sentences
}

const ABBREVIATIONS: &[&str] = &[
    "art", "arts", "inc", "res", "nro", "num", "dr", "dra", "ing", "lic",
];

fn ends_with_abbreviation(current: &str) -> bool {
    let without_dot = current.trim_end_matches('.');
    let last_word = without_dot
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default();
    ABBREVIATIONS.contains(&fold(last_word).as_str())
}

fn push_trimmed(out: &mut Vec<String>, s: &str) {
    let trimmed = s.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

/// First `max` characters of `text` (char-boundary safe).
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Last `max` characters of `text` (char-boundary safe).
pub fn tail_chars(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    text.chars().skip(count - max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_strips_accents_and_case() {
        assert_eq!(fold("Inscripción ÚNICA"), "inscripcion unica");
        assert_eq!(fold("Año"), "ano");
    }

    #[test]
    fn phrase_matching_respects_word_boundaries() {
        assert!(contains_phrase("La Maestría en IA (MIA)", "mia"));
        assert!(!contains_phrase("La familia", "mia"));
        assert!(contains_phrase("trabajo final integrador", "Trabajo Final"));
        assert!(!contains_phrase("texto", ""));
    }

    #[test]
    fn codes_match_only_as_written() {
        assert!(is_code("MIA") && is_code("CEIoT") && is_code("GdP"));
        assert!(!is_code("Trabajo Final") && !is_code("tesis") && !is_code("Maestría"));
        assert!(mentions_form("¿Qué pide la MIA?", "MIA"));
        assert!(!mentions_form("La duda es mía.", "MIA"));
        assert!(!mentions_form("la familia", "MIA"));
        assert!(mentions_form(
            "la maestria en inteligencia artificial",
            "Maestría en Inteligencia Artificial"
        ));
    }

    #[test]
    fn sentences_split_on_terminal_punctuation() {
        let s = split_sentences("La asistencia es 75%. ¿Y la regularidad? Sí, aplica!");
        assert_eq!(
            s,
            vec!["La asistencia es 75%.", "¿Y la regularidad?", "Sí, aplica!"]
        );
    }

    #[test]
    fn decimal_numbers_do_not_split() {
        let s = split_sentences("La nota mínima es 4.5 puntos. Fin.");
        assert_eq!(s.len(), 2);
        assert!(s[0].contains("4.5"));
    }

    #[test]
    fn article_abbreviation_does_not_split() {
        let s = split_sentences("Según el Art. 12 la regularidad exige 75%. Otra oración.");
        assert_eq!(s.len(), 2);
        assert!(s[0].starts_with("Según el Art. 12"));
    }

    #[test]
    fn tail_keeps_most_recent_characters() {
        assert_eq!(tail_chars("abcdef", 3), "def");
        assert_eq!(tail_chars("ñandú", 10), "ñandú");
        assert_eq!(truncate_chars("ñandú", 2), "ña");
    }
}
