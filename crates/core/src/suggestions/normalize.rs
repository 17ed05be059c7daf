//! Text folding for keyword matching.
//!
//! Clinicians type on a mix of Persian and Arabic keyboard layouts, with or without
//! zero-width non-joiners, and switch between Eastern and Western digits. Both the dictionary
//! keywords and the user input go through [`normalize`] so they compare equal.

const ZWNJ: char = '\u{200C}';

/// Folds `text` into the canonical matching form.
///
/// - lowercases Latin text
/// - maps Arabic `ي`/`ى`/`ك`/`ة` to Persian `ی`/`ی`/`ک`/`ه`
/// - maps Persian and Arabic-Indic digits to ASCII
/// - drops Arabic diacritics and tatweel
/// - turns ZWNJ and punctuation into spaces and collapses whitespace
pub fn normalize(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text.chars() {
        let mapped = match c {
            'ي' | 'ى' => Some('ی'),
            'ك' => Some('ک'),
            'ة' => Some('ه'),
            '\u{06F0}'..='\u{06F9}' => char::from_digit(c as u32 - 0x06F0, 10),
            '\u{0660}'..='\u{0669}' => char::from_digit(c as u32 - 0x0660, 10),
            '\u{064B}'..='\u{0652}' | '\u{0640}' => None,
            ZWNJ => Some(' '),
            '،' | '؛' | '؟' | '«' | '»' => Some(' '),
            c if c.is_ascii_punctuation() && c != '/' && c != '.' => Some(' '),
            c if c.is_whitespace() => Some(' '),
            c => Some(c),
        };

        if let Some(m) = mapped {
            for lower in m.to_lowercase() {
                folded.push(lower);
            }
        }
    }

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `keyword` (already normalised) occurs in `text` (already normalised).
///
/// The keyword must start on a word boundary. Latin keywords must also end on one (an
/// optional plural `s`/`es` is allowed) so that `cold` does not match `scolding`. Persian
/// keywords may be followed by suffixes such as `ها` or `ی`, except two-letter ones like
/// `تب` which would otherwise match inside unrelated words.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    let latin = keyword.is_ascii();
    let short = keyword.chars().count() <= 2;

    let mut start = 0;
    while let Some(found) = text[start..].find(keyword) {
        let begin = start + found;
        let end = begin + keyword.len();

        let starts_on_boundary = text[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());

        let ends_on_boundary = if latin {
            let rest = &text[end..];
            let rest = rest
                .strip_prefix("es")
                .filter(|r| r.chars().next().map_or(true, |c| !c.is_alphanumeric()))
                .or_else(|| rest.strip_prefix('s'))
                .unwrap_or(rest);
            rest.chars().next().map_or(true, |c| !c.is_alphanumeric())
        } else if short {
            text[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
        } else {
            true
        };

        if starts_on_boundary && ends_on_boundary {
            return true;
        }

        start = begin
            + text[begin..]
                .chars()
                .next()
                .map_or(1, |c| c.len_utf8());
    }

    false
}
