use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Strip accents and uppercase `text` for the AEAT file.
///
/// The text is decomposed, every combining mark not listed in `preserved`
/// is dropped, and the result is recomposed. Characters whose uppercase
/// form is more than one character (such as `ß`) are kept as they are, so
/// the character count never grows.
pub fn normalize(text: &str, preserved: &[char]) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c) || preserved.contains(c))
        .collect();
    stripped.nfc().map(upper).collect()
}

fn upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{COMBINING_CEDILLA, COMBINING_TILDE};

    const MARKS: &[char] = &[COMBINING_CEDILLA, COMBINING_TILDE];

    #[test]
    fn keeps_enye_and_cedilla() {
        assert_eq!(normalize("Muñoz", MARKS), "MUÑOZ");
        assert_eq!(normalize("façana", MARKS), "FAÇANA");
    }

    #[test]
    fn strips_other_accents() {
        assert_eq!(normalize("José Pérez Güell à", MARKS), "JOSE PEREZ GUELL A");
    }

    #[test]
    fn without_preserved_marks_everything_is_stripped() {
        assert_eq!(normalize("Ñandú", &[]), "NANDU");
    }

    #[test]
    fn multi_char_uppercase_kept() {
        assert_eq!(normalize("straße", MARKS), "STRAßE");
    }

    #[test]
    fn length_preserved() {
        let text = "Ibáñez Çelik Ørsted 12,50 €";
        assert_eq!(normalize(text, MARKS).chars().count(), text.chars().count());
    }
}
