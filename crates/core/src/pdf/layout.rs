//! Page geometry, line wrapping and pagination for the prescription PDF.
//!
//! Everything here works in millimetres and character counts; no font metrics are read.

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 20.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

/// Footer baseline, inside the bottom margin.
pub const FOOTER_Y_MM: f32 = 10.0;

const PT_TO_MM: f32 = 0.3528;
/// Average advance width of a glyph, as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

/// Baseline-to-baseline distance for a font size in points.
pub fn line_height_mm(font_size: f32) -> f32 {
    font_size * PT_TO_MM * 1.45
}

/// Approximate rendered width of `text`.
pub fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * PT_TO_MM * AVG_GLYPH_EM
}

/// How many characters fit on one line of `width_mm` at `font_size`.
pub fn chars_per_line(font_size: f32, width_mm: f32) -> usize {
    ((width_mm / (font_size * PT_TO_MM * AVG_GLYPH_EM)) as usize).max(1)
}

/// Word-wraps `text` to lines of at most `max_chars` characters.
///
/// Explicit newlines are kept as line breaks. Words longer than a line are split. Blank
/// input produces no lines.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            if current_len > 0 && current_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        if current_len > 0 {
            lines.push(current);
        }
    }

    lines
}

/// Vertical cursor that moves down the page and wraps onto a new page at the bottom margin.
#[derive(Debug, Clone)]
pub struct Pager {
    y: f32,
    page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new()
    }
}

impl Pager {
    pub fn new() -> Self {
        Self {
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Reserves `height` millimetres for the next line and returns its baseline. Moves to
    /// the next page when the line would cross the bottom margin.
    pub fn reserve(&mut self, height: f32) -> f32 {
        if self.y - height < MARGIN_MM {
            self.page += 1;
            self.y = PAGE_HEIGHT_MM - MARGIN_MM - height;
        } else {
            self.y -= height;
        }
        self.y
    }

    /// Adds vertical space. A gap never starts a new page on its own.
    pub fn gap(&mut self, height: f32) {
        self.y = (self.y - height).max(MARGIN_MM);
    }
}
