//! Terminal display width helpers.
//!
//! Glyph sets and rendered map rows are checked against these so every map
//! cell occupies exactly one terminal column.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Display width of a single glyph.
pub fn glyph_width(glyph: char) -> usize {
    unicode_width::UnicodeWidthChar::width(glyph).unwrap_or(0)
}
