//! Minimal right-to-left handling for PDF text.
//!
//! PDF text operators draw glyphs left to right. Dari text is stored in logical order, so a
//! line containing Arabic-script characters is reordered into visual order before drawing:
//! the run order is reversed and each RTL run is reversed character by character, while
//! embedded LTR runs (numbers, Latin drug names) keep their internal order.
//!
//! There is no contextual glyph shaping; fonts without presentation forms render isolated
//! letters.

fn is_digit(c: char) -> bool {
    matches!(c, '\u{0660}'..='\u{0669}' | '\u{06F0}'..='\u{06F9}')
}

fn is_rtl(c: char) -> bool {
    !is_digit(c)
        && matches!(c,
            '\u{0590}'..='\u{08FF}'
            | '\u{FB1D}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}')
}

/// Latin letters and digits of any script keep left-to-right order.
fn is_ltr(c: char) -> bool {
    is_digit(c) || (c.is_alphanumeric() && !is_rtl(c))
}

pub fn contains_rtl(text: &str) -> bool {
    text.chars().any(is_rtl)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Rtl,
    Ltr,
}

/// Reorders a single line from logical to visual order.
///
/// Lines without RTL characters are returned unchanged. Neutral characters (spaces,
/// punctuation) take the direction of the run they sit in; neutrals at a boundary between
/// two runs of different direction attach to the RTL side.
pub fn visual_order(line: &str) -> String {
    if !contains_rtl(line) {
        return line.to_string();
    }

    let mut runs: Vec<(Direction, Vec<char>)> = Vec::new();
    let mut pending_neutral: Vec<char> = Vec::new();

    for c in line.chars() {
        let dir = if is_rtl(c) {
            Some(Direction::Rtl)
        } else if is_ltr(c) {
            Some(Direction::Ltr)
        } else {
            None
        };

        let Some(dir) = dir else {
            pending_neutral.push(c);
            continue;
        };

        match runs.last().map(|(last, _)| *last) {
            Some(last) if last == dir => {
                if let Some((_, chars)) = runs.last_mut() {
                    chars.append(&mut pending_neutral);
                    chars.push(c);
                }
            }
            Some(Direction::Rtl) => {
                if let Some((_, chars)) = runs.last_mut() {
                    chars.append(&mut pending_neutral);
                }
                runs.push((dir, vec![c]));
            }
            _ => {
                let mut run = std::mem::take(&mut pending_neutral);
                run.push(c);
                runs.push((dir, run));
            }
        }
    }
    if let Some((_, chars)) = runs.last_mut() {
        chars.append(&mut pending_neutral);
    }

    runs.iter()
        .rev()
        .map(|(dir, chars)| match dir {
            Direction::Rtl => chars.iter().rev().collect::<String>(),
            Direction::Ltr => chars.iter().collect::<String>(),
        })
        .collect()
}

/// Replaces every character outside Latin-1 with `?`.
///
/// Built-in PDF fonts only cover WinAnsi; this keeps rendering total without a TTF.
pub fn latin1_lossy(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_text_is_untouched() {
        assert_eq!(visual_order("Paracetamol 500mg"), "Paracetamol 500mg");
        assert!(!contains_rtl("Paracetamol"));
    }

    #[test]
    fn pure_rtl_is_reversed() {
        assert!(contains_rtl("تب"));
        assert_eq!(visual_order("سر درد"), "درد رس");
    }

    #[test]
    fn embedded_ltr_keeps_its_order() {
        let visual = visual_order("دوا Paracetamol روزانه");
        assert_eq!(visual, "هنازور Paracetamol اود");
    }

    #[test]
    fn persian_digits_are_not_reversed() {
        assert_eq!(visual_order("۱۲ روز"), "زور ۱۲");
    }

    #[test]
    fn latin1_lossy_replaces_other_scripts() {
        assert_eq!(latin1_lossy("Ali علی café"), "Ali ??? café");
    }
}
