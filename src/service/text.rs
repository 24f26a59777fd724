//! Character-offset helpers shared by the extractors
//!
//! Regex matches report byte offsets; everything the report exposes (entity offsets,
//! relationship distances, context windows) is measured in characters.

/// Convert a byte offset into a character offset
pub fn char_offset(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Byte range covering `radius` characters on each side of `start..end` (byte offsets)
pub fn window_bounds(text: &str, start: usize, end: usize, radius: usize) -> (usize, usize) {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(radius.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let from = if radius == 0 { start } else { from };

    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    (from, to)
}

/// Text of the ±`radius` character window around `start..end`
pub fn context_window(text: &str, start: usize, end: usize, radius: usize) -> String {
    let (from, to) = window_bounds(text, start, end, radius);
    normalize_whitespace(&text[from..to])
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
