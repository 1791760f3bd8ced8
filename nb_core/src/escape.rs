//! URL escaping helpers shared by the resolvers.
//!
//! Source reference fields are stored percent-decoded; these helpers
//! re-encode them at the single point where outbound URLs are built.

use std::borrow::Cow;

/// Percent-encodes a URL path while keeping `/` separators intact.
pub fn quote_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Percent-decodes a URL component, passing it through unchanged when it
/// is not valid percent-encoding.
pub fn unescape(component: &str) -> String {
    urlencoding::decode(component)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| component.to_string())
}

/// Joins URL path segments with single `/` separators.
pub fn url_path_join(parts: &[&str]) -> String {
    let mut joined = String::new();
    for part in parts {
        let trimmed = part.trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        joined.push('/');
        joined.push_str(trimmed);
    }
    if joined.is_empty() {
        joined.push('/');
    }
    if parts.last().is_some_and(|last| last.ends_with('/')) && joined != "/" {
        joined.push('/');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_path_preserves_separators() {
        assert_eq!(quote_path("a b/c.ipynb"), "a%20b/c.ipynb");
        assert_eq!(quote_path("plain/path"), "plain/path");
    }

    #[test]
    fn quote_path_escapes_query_characters() {
        assert_eq!(quote_path("nb?.ipynb"), "nb%3F.ipynb");
    }

    #[test]
    fn unescape_round_trips() {
        assert_eq!(unescape("a%20b"), "a b");
        assert_eq!(unescape("plain"), "plain");
    }

    #[test]
    fn url_path_join_collapses_slashes() {
        assert_eq!(url_path_join(&["/localfile", "sub/", "a.ipynb"]), "/localfile/sub/a.ipynb");
        assert_eq!(url_path_join(&["/localfile", "", "a.ipynb"]), "/localfile/a.ipynb");
    }

    #[test]
    fn url_path_join_keeps_trailing_slash() {
        assert_eq!(url_path_join(&["/localfile", "sub/"]), "/localfile/sub/");
    }
}
