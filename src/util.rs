// src/util.rs — Shared string helpers

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a prefix of at most `max_len` bytes cut on a char boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Replace every line break (`\r\n`, `\n`, `\r`) with a single space.
pub fn flatten_newlines(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate_str("model not found", 64), "model not found");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate_str("connection refused", 10), "connection");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "café" is 5 bytes (é = 2 bytes), truncating at 4 should not split é
        assert_eq!(truncate_str("café", 4), "caf");
    }

    #[test]
    fn test_truncate_zero_max() {
        assert_eq!(truncate_str("hello", 0), "");
    }

    #[test]
    fn test_flatten_newlines() {
        assert_eq!(flatten_newlines("a\nb"), "a b");
        assert_eq!(flatten_newlines("a\r\nb"), "a b");
        assert_eq!(flatten_newlines("a\rb\n\nc"), "a b  c");
        assert_eq!(flatten_newlines("plain"), "plain");
    }
}
