/// Joins `value_to_escape` onto `value` using `prefix` and `suffix`.
///
/// Backslashes inside `value_to_escape` are doubled and any occurrence of the
/// first two prefix characters gets a backslash between them, so the joined key
/// can be split again unambiguously. An empty `value_to_escape` returns `value`
/// unchanged, and an empty `value` returns the escaped part alone.
pub fn escape(value: &str, prefix: &str, value_to_escape: &str, suffix: &str) -> String {
    if value_to_escape.is_empty() {
        return value.to_string();
    }

    let mut escaped = value_to_escape.replace('\\', "\\\\");
    let mut separator = prefix.chars();
    if let (Some(first), Some(second)) = (separator.next(), separator.next()) {
        escaped = escaped.replace(
            &format!("{}{}", first, second),
            &format!("{}\\{}", first, second),
        );
    }

    if value.is_empty() {
        escaped
    } else {
        format!("{}{}{}{}", value, prefix, escaped, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::escape;

    #[test]
    fn empty_value_to_escape_returns_value() {
        assert_eq!(escape("Rethwisch", ", ", "", ""), "Rethwisch");
    }

    #[test]
    fn empty_value_returns_escaped_part() {
        assert_eq!(escape("", ", ", "Klein Boden", ""), "Klein Boden");
        assert_eq!(escape("", ", ", "a, b", ""), "a,\\ b");
    }

    #[test]
    fn joins_with_prefix_and_suffix() {
        assert_eq!(
            escape("Rethwisch", ", ", "Klein Boden", ""),
            "Rethwisch, Klein Boden"
        );
        assert_eq!(escape("Mustermann", " (", "CDU", ")"), "Mustermann (CDU)");
    }

    #[test]
    fn escapes_backslash_and_separator() {
        assert_eq!(escape("x", ", ", "a\\b", ""), "x, a\\\\b");
        assert_eq!(escape("x", ", ", "Nord, Süd", ""), "x, Nord,\\ Süd");
    }
}
