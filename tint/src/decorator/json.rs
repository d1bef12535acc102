//! JSON projection helpers.

use serde_json::Value;

/// Returns `true` for characters that break JavaScript string literals or
/// render invisibly when JSON is embedded in a page.
const fn is_js_unsafe(c: char) -> bool {
    matches!(
        c,
        '\u{007f}'..='\u{009f}'
            | '\u{00ad}'
            | '\u{0600}'..='\u{0604}'
            | '\u{070f}'
            | '\u{17b4}'
            | '\u{17b5}'
            | '\u{200c}'..='\u{200f}'
            | '\u{2028}'..='\u{202f}'
            | '\u{2060}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff0}'..='\u{ffff}'
    )
}

/// Remove JavaScript-unsafe characters from `input`.
///
/// ```
/// assert_eq!(tint::strip_js_unsafe("a\u{2028}b\u{feff}c"), "abc");
/// ```
#[must_use]
pub fn strip_js_unsafe(input: &str) -> String {
    input.chars().filter(|c| !is_js_unsafe(*c)).collect()
}

/// Strip unsafe characters from every string inside `value`.
pub(crate) fn sanitize(value: Value) -> Value {
    match value {
        Value::String(text) if text.chars().any(is_js_unsafe) => {
            Value::String(strip_js_unsafe(&text))
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, nested)| (key, sanitize(nested)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("plain", "plain")]
    #[case("line\u{2028}separator", "lineseparator")]
    #[case("soft\u{00ad}hyphen", "softhyphen")]
    #[case("\u{200d}zero width", "zero width")]
    #[case("del\u{007f}ete", "delete")]
    #[case("caf\u{e9}", "caf\u{e9}")]
    fn strips_unsafe_characters(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_js_unsafe(input), expected);
    }

    #[test]
    fn sanitizes_nested_strings() {
        let value = json!({"tags": ["a\u{2029}", 1], "nested": {"s": "\u{feff}x"}});
        assert_eq!(sanitize(value), json!({"tags": ["a", 1], "nested": {"s": "x"}}));
    }
}
