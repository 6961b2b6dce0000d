//! Text normalization
//!
//! Pure functions that prepare raw chat input for matching: lowercase,
//! strip punctuation, collapse whitespace, and pull out a size marker so
//! "pizza kbira" and "pizza" resolve to the same lookup.

use snackbot_core::SizeChoice;

/// Keywords meaning "large", checked before the small list.
/// Large wins when both sizes appear in one utterance.
const LARGE_KEYWORDS: &[&str] = &[
    "kbira", "kbir", "grande", "grand", "large", "big", "كبيرة", "كبير",
];

/// Keywords meaning "small"
const SMALL_KEYWORDS: &[&str] = &[
    "sghira", "sghir", "petite", "petit", "small", "صغيرة", "صغير",
];

/// Lowercase, strip punctuation, collapse whitespace
///
/// Letters of any script and digits pass through; everything else becomes
/// a word separator.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_space = true;
    for c in raw.to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Scan normalized text for a size marker and strip it
///
/// Large keywords are checked first; on "pizza kbira sghira" the large
/// marker wins and both rules below agree because only the first matching
/// keyword is removed.
pub fn extract_size(normalized: &str) -> (Option<SizeChoice>, String) {
    if let Some(rest) = strip_keyword(normalized, LARGE_KEYWORDS) {
        return (Some(SizeChoice::Large), rest);
    }
    if let Some(rest) = strip_keyword(normalized, SMALL_KEYWORDS) {
        return (Some(SizeChoice::Small), rest);
    }
    (None, normalized.to_string())
}

fn strip_keyword(text: &str, keywords: &[&str]) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let hit = words
        .iter()
        .position(|w| keywords.iter().any(|k| w == k))?;
    let rest: Vec<&str> = words
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != hit)
        .map(|(_, w)| *w)
        .collect();
    Some(rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("  Pizza,   Margherita!! "), "pizza margherita");
        assert_eq!(normalize("BGHIT   tacos..."), "bghit tacos");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_keeps_arabic() {
        assert_eq!(normalize("بغيت بيتزا!"), "بغيت بيتزا");
    }

    #[test]
    fn test_extract_size_strips_keyword() {
        let (size, rest) = extract_size("pizza kbira");
        assert_eq!(size, Some(SizeChoice::Large));
        assert_eq!(rest, "pizza");

        let (size, rest) = extract_size("petite margherita");
        assert_eq!(size, Some(SizeChoice::Small));
        assert_eq!(rest, "margherita");
    }

    #[test]
    fn test_large_wins_on_ambiguity() {
        let (size, _) = extract_size("pizza kbira sghira");
        assert_eq!(size, Some(SizeChoice::Large));

        let (size, _) = extract_size("sghira kbira pizza");
        assert_eq!(size, Some(SizeChoice::Large));
    }

    #[test]
    fn test_no_size_marker() {
        let (size, rest) = extract_size("tacos poulet");
        assert_eq!(size, None);
        assert_eq!(rest, "tacos poulet");
    }

    #[test]
    fn test_arabic_size_keyword() {
        let (size, rest) = extract_size(normalize("بيتزا كبيرة").as_str());
        assert_eq!(size, Some(SizeChoice::Large));
        assert_eq!(rest, "بيتزا");
    }
}
