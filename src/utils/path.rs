//! Path utilities for clip output naming

/// Path utilities for output file naming
pub struct PathUtils;

impl PathUtils {
    /// Map every character outside `[A-Za-z0-9_-]` to `_`.
    ///
    /// One output character per input character, so the result keeps the
    /// label's length (in chars) and order. Idempotent.
    pub fn sanitize_label(label: &str) -> String {
        label
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Whether a string is already a sanitized label
    pub fn is_safe_label(label: &str) -> bool {
        label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}
