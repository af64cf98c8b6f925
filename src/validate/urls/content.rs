//! URL extraction from markdown bodies.

use std::sync::LazyLock;

use regex::Regex;

/// `[text](url)` and `[text](url "title")`
static RE_INLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\]\((http[^)"]+)"#).unwrap());
/// `<url>`
static RE_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<(http[^>]+)").unwrap());
/// `[id]: url` and `[id]: url "title"`
static RE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#": (http[^"\n]+)"#).unwrap());

/// Every URL linked from `markdown`, trimmed, grouped by link style.
pub fn extract_urls(markdown: &str) -> Vec<String> {
    [&*RE_INLINE, &*RE_AUTOLINK, &*RE_REFERENCE]
        .into_iter()
        .flat_map(|re| re.captures_iter(markdown))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_link_styles() {
        let markdown = r#"
Python is [supported](https://www.python.org/downloads/ "Downloads") until
the [end](https://devguide.python.org/versions/). See <https://peps.python.org/pep-0602/>.

[policy]: https://example.com/policy "Release policy"
"#;
        assert_eq!(
            extract_urls(markdown),
            [
                "https://www.python.org/downloads/",
                "https://devguide.python.org/versions/",
                "https://peps.python.org/pep-0602/",
                "https://example.com/policy",
            ]
        );
    }

    #[test]
    fn test_extract_ignores_relative_links() {
        let markdown = "See [nodejs](/nodejs) and [mail](mailto:x@example.com).";
        assert!(extract_urls(markdown).is_empty());
    }

    #[test]
    fn test_extract_empty() {
        assert!(extract_urls("").is_empty());
    }
}
