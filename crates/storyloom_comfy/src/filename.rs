//! File-name sanitization.

/// Maximum length of a sanitized name.
const MAX_LEN: usize = 100;

/// Make a query string safe to use as a file name on any platform.
///
/// Strips filesystem-illegal characters, turns whitespace runs into single
/// hyphens, collapses repeated hyphens, trims leading/trailing hyphens, and
/// truncates to 100 characters.
pub fn sanitize_filename(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for c in raw.chars() {
        if matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
            continue;
        }
        if c.is_whitespace() || c == '-' {
            pending_hyphen = !out.is_empty();
            continue;
        }
        if pending_hyphen {
            out.push('-');
            pending_hyphen = false;
        }
        out.push(c);
    }

    out.chars().take(MAX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_illegal_characters() {
        let name = sanitize_filename(r#"Which: "Trend"? / Today"#);
        assert!(!name.contains(|c| "<>:\"/\\|?*".contains(c)));
        assert!(!name.starts_with('-'));
        assert!(!name.ends_with('-'));
        assert!(!name.contains("--"));
        assert!(name.len() <= 100);
        assert_eq!(name, "Which-Trend-Today");
    }

    #[test]
    fn test_collapses_whitespace_and_hyphens() {
        assert_eq!(sanitize_filename("a   b - c"), "a-b-c");
        assert_eq!(sanitize_filename("--edge case--"), "edge-case");
    }

    #[test]
    fn test_truncates_long_input() {
        let long = "x".repeat(500);
        assert_eq!(sanitize_filename(&long).len(), 100);
    }

    #[test]
    fn test_all_illegal_yields_empty() {
        assert_eq!(sanitize_filename("??//**"), "");
    }
}
