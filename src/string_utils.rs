//! Char/byte index conversion and HTML escaping
//!
//! egui cursors count characters; `String` slicing counts bytes. Anything
//! that moves between the two must go through here so a multi-byte
//! character is never split.

/// Clamp `index` down to the nearest char boundary (or `s.len()`).
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0)
}

/// Byte offset of the `char_index`-th character, saturating at `s.len()`.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    match s.char_indices().nth(char_index) {
        Some((offset, _)) => offset,
        None => s.len(),
    }
}

/// Characters before `byte_index`. An offset inside a character counts
/// only the characters that end before it.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    char_len(&s[..floor_char_boundary(s, byte_index)])
}

#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Escape text for use inside HTML element content or attribute values.
pub fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
