//! Script detection for bilingual replies
//!
//! Canned replies exist in an Arabic-script and a Latin-script variant; the
//! Arabic one is picked only when the raw input itself carries Arabic
//! characters. Detection covers the main Arabic block plus the supplement
//! and presentation-form ranges used by chat keyboards.

/// Whether a character belongs to one of the Arabic Unicode blocks
pub fn is_arabic_char(c: char) -> bool {
    matches!(c,
        // Arabic
        '\u{0600}'..='\u{06FF}' |
        // Arabic Supplement
        '\u{0750}'..='\u{077F}' |
        // Arabic Presentation Forms-A
        '\u{FB50}'..='\u{FDFF}' |
        // Arabic Presentation Forms-B
        '\u{FE70}'..='\u{FEFF}'
    )
}

/// Whether the text contains any Arabic-script characters
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(is_arabic_char)
}
