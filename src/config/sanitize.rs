//! Normalisation of free-text input into path and SSH host segments.

/// Maximum number of characters kept from the raw input.
pub const MAX_NAME_LEN: usize = 32;

/// Whether `c` may appear in a sanitized name (`[A-Za-z0-9_.-]`).
#[must_use]
pub const fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Normalise `raw` into a safe path/host segment.
///
/// Strips surrounding whitespace, truncates to [`MAX_NAME_LEN`] characters,
/// then drops every character outside `[A-Za-z0-9_.-]`. Never fails; input
/// made only of invalid characters yields the empty string, which callers
/// must reject.
///
/// # Examples
///
/// ```
/// use devprofile_cli::config::sanitize::sanitize;
///
/// assert_eq!(sanitize("  alice  "), "alice");
/// assert_eq!(sanitize("John Doe!"), "JohnDoe");
/// assert_eq!(sanitize("???"), "");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .take(MAX_NAME_LEN)
        .filter(|&c| is_allowed(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_surrounding_whitespace() {
        assert_eq!(sanitize("\t bob \n"), "bob");
    }

    #[test]
    fn removes_invalid_characters() {
        assert_eq!(sanitize("pnc/nz"), "pncnz");
        assert_eq!(sanitize("a b@c#d"), "abcd");
        assert_eq!(sanitize("prayer-clan_2.0"), "prayer-clan_2.0");
    }

    #[test]
    fn truncates_before_filtering() {
        let raw = format!("{}{}", "a".repeat(30), "!!bbbb");
        // The 32-character window is "a"*30 + "!!", so only the a's survive
        assert_eq!(sanitize(&raw), "a".repeat(30));
    }

    #[test]
    fn output_never_exceeds_limit() {
        for raw in ["x".repeat(100), " y".repeat(40), "é".repeat(50), String::new()] {
            let out = sanitize(&raw);
            assert!(out.chars().count() <= MAX_NAME_LEN, "too long: {out}");
            assert!(out.len() <= MAX_NAME_LEN, "too many bytes: {out}");
            assert!(out.chars().all(is_allowed), "invalid char in: {out}");
        }
    }

    #[test]
    fn non_ascii_letters_are_removed() {
        assert_eq!(sanitize("zoë"), "zo");
        assert_eq!(sanitize("日本"), "");
    }

    #[test]
    fn valid_names_are_unchanged() {
        for name in ["alice", "Bob42", "a".repeat(32).as_str(), "0", "ZZZ999"] {
            assert_eq!(sanitize(name), name);
        }
    }

    #[test]
    fn sanitize_is_idempotent() {
        for raw in ["  Mixed Case !! name ", "x".repeat(64).as_str(), "a.b-c_d"] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn all_invalid_input_yields_empty() {
        assert_eq!(sanitize("   "), "");
        assert_eq!(sanitize("@#$%"), "");
    }
}
