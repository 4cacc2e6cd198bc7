//! HTML escaping for text and attribute-value positions.

use std::borrow::Cow;

/// Escape text content for an HTML element body.
///
/// Replaces `&` and `<` with entities. Returns a borrow when the input
/// needs no escaping.
#[must_use]
pub fn escape_text(input: &str) -> Cow<'_, str> {
    escape(input, false)
}

/// Escape a value for an HTML attribute position.
///
/// Replaces `&`, `<` and `"` with entities.
#[must_use]
pub fn escape_attribute(input: &str) -> Cow<'_, str> {
    escape(input, true)
}

fn escape(input: &str, quotes: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| c == '&' || c == '<' || (quotes && c == '"');

    let Some(first) = input.find(needs_escape) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 8);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' if quotes => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_escapes_amp_and_lt() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_text_leaves_quotes_alone() {
        assert_eq!(escape_text(r#"say "hi""#), r#"say "hi""#);
    }

    #[test]
    fn test_attribute_escapes_quotes() {
        assert_eq!(
            escape_attribute(r#"x="1" & y<2"#),
            "x=&quot;1&quot; &amp; y&lt;2"
        );
    }

    #[test]
    fn test_clean_input_is_borrowed() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed(_)));
        assert!(matches!(escape_attribute("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty() {
        assert_eq!(escape_text(""), "");
        assert_eq!(escape_attribute(""), "");
    }
}
