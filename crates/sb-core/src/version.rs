//! Optimistic-concurrency version tokens.
//!
//! A site's `version` is a counter. Over HTTP it travels as a strong `ETag`
//! (`"3"`) and comes back in `If-Match`; request bodies may also carry a bare
//! `version` number.

use crate::errors::CoreError;

/// A parsed `If-Match` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionToken {
    /// `*`: matches whatever is stored.
    Any,
    Exact(i64),
}

impl VersionToken {
    /// The concrete version to guard on, if any.
    #[must_use]
    pub const fn expected(self) -> Option<i64> {
        match self {
            Self::Any => None,
            Self::Exact(v) => Some(v),
        }
    }
}

/// Parse an `If-Match` header value.
///
/// Accepts `3`, `"3"`, `W/"3"` and `*`. A comma-separated list uses its first
/// entry.
///
/// # Errors
///
/// Returns [`CoreError::InvalidVersionToken`] when the value is not a version.
pub fn parse_if_match(raw: &str) -> Result<VersionToken, CoreError> {
    let first = raw.split(',').next().unwrap_or_default().trim();
    if first == "*" {
        return Ok(VersionToken::Any);
    }
    let unweak = first.strip_prefix("W/").unwrap_or(first);
    let unquoted = unweak
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(unweak);
    unquoted
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|v| *v > 0)
        .map(VersionToken::Exact)
        .ok_or_else(|| CoreError::InvalidVersionToken(raw.to_string()))
}

/// Render a version as a strong entity tag.
#[must_use]
pub fn etag(version: i64) -> String {
    format!("\"{version}\"")
}

/// Compare the stored version against the caller's expectation.
///
/// `None` means the caller sent no token and the check is skipped.
///
/// # Errors
///
/// Returns [`CoreError::VersionConflict`] on mismatch.
pub fn check_version(id: &str, current: i64, expected: Option<i64>) -> Result<(), CoreError> {
    match expected {
        Some(expected) if expected != current => Err(CoreError::VersionConflict {
            id: id.to_string(),
            current,
            expected,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3", VersionToken::Exact(3))]
    #[case("\"3\"", VersionToken::Exact(3))]
    #[case("W/\"12\"", VersionToken::Exact(12))]
    #[case(" \"7\" , \"8\"", VersionToken::Exact(7))]
    #[case("*", VersionToken::Any)]
    fn parses_tokens(#[case] raw: &str, #[case] expected: VersionToken) {
        assert_eq!(parse_if_match(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("\"2025-03-01\"")]
    #[case("0")]
    #[case("-1")]
    fn rejects_garbage(#[case] raw: &str) {
        assert!(matches!(
            parse_if_match(raw),
            Err(CoreError::InvalidVersionToken(_))
        ));
    }

    #[test]
    fn etag_roundtrips_through_parser() {
        assert_eq!(etag(5), "\"5\"");
        assert_eq!(parse_if_match(&etag(5)).unwrap().expected(), Some(5));
    }

    #[test]
    fn check_version_skips_without_token() {
        assert!(check_version("SITE-1", 4, None).is_ok());
        assert!(check_version("SITE-1", 4, Some(4)).is_ok());
        let err = check_version("SITE-1", 4, Some(3)).unwrap_err();
        assert!(err.is_conflict());
    }
}
