//! Shared utility functions

use unicode_width::UnicodeWidthChar;

/// Keep at most `max_chars` characters of `s`.
///
/// Counts Unicode scalar values, so multi-byte names (accents, emoji) are
/// never split mid-character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_chars("Thread with Alice", 5), "Threa");
/// ```
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Truncate to a terminal display width, appending `…` when cut
pub fn fit_width(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    let mut width = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            // Make room for the ellipsis
            while width + 1 > max_width {
                match out.pop() {
                    Some(last) => width -= last.width().unwrap_or(0),
                    None => break,
                }
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_shorter_than_max() {
        assert_eq!(truncate_chars("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_chars("日本語のスレッド", 2), "日本");
        assert_eq!(truncate_chars("Zoë Ørsted", 3), "Zoë");
    }

    #[test]
    fn test_truncate_to_zero() {
        assert_eq!(truncate_chars("hello", 0), "");
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("abcdef", 10), "abcdef");
        assert_eq!(fit_width("abcdef", 4), "abc…");
        // Wide characters take two cells each
        assert_eq!(fit_width("日本語", 4), "日…");
        assert_eq!(fit_width("abc", 0), "");
    }
}
