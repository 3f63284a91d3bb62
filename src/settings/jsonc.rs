//! Tolerant parsing for user-edited JSON configuration files.
//!
//! Runtime config files are frequently hand-edited and may carry comments
//! or trailing commas. Parsing strips those down to plain JSON while
//! preserving string contents, then hands the result to serde_json.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",(\s*[}\]])").unwrap());

/// Parse a JSONC document: strips a leading BOM, line and block comments,
/// and trailing commas before `}` or `]`, then parses as JSON.
pub fn parse(content: &str) -> serde_json::Result<Value> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let stripped = strip_comments(content);
    let normalized = TRAILING_COMMA.replace_all(&stripped, "$1");
    serde_json::from_str(&normalized)
}

/// Remove `//` and `/* */` comments, leaving string literals untouched.
/// Line comments keep their terminating newline; block comment bodies are
/// dropped entirely.
fn strip_comments(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let len = chars.len();
    let mut result = String::with_capacity(content.len());
    let mut in_string = false;
    let mut i = 0;

    while i < len {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if in_string {
            result.push(c);
            if c == '\\' && i + 1 < len {
                result.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
        } else {
            match (c, next) {
                ('"', _) => {
                    in_string = true;
                    result.push(c);
                    i += 1;
                }
                ('/', Some('/')) => {
                    while i < len && chars[i] != '\n' {
                        i += 1;
                    }
                }
                ('/', Some('*')) => {
                    i += 2;
                    while i + 1 < len && !(chars[i] == '*' && chars[i + 1] == '/') {
                        i += 1;
                    }
                    i += 2;
                }
                _ => {
                    result.push(c);
                    i += 1;
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_unchanged() {
        let parsed = parse(r#"{"key": "value"}"#).unwrap();
        assert_eq!(parsed["key"], "value");
    }

    #[test]
    fn test_line_and_block_comments() {
        let doc = r#"{
            // line comment
            "key": "value",
            /* block
               comment */
            "other": 2
        }"#;
        let parsed = parse(doc).unwrap();
        assert_eq!(parsed["key"], "value");
        assert_eq!(parsed["other"], 2);
    }

    #[test]
    fn test_trailing_commas() {
        let parsed = parse("{\"list\": [1, 2,], \"key\": \"v\",}").unwrap();
        assert_eq!(parsed["list"], serde_json::json!([1, 2]));
        assert_eq!(parsed["key"], "v");
    }

    #[test]
    fn test_comment_markers_inside_strings_kept() {
        let parsed = parse(r#"{"url": "https://example.com", "glob": "a/*"}"#).unwrap();
        assert_eq!(parsed["url"], "https://example.com");
        assert_eq!(parsed["glob"], "a/*");
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let parsed = parse(r#"{"key": "a \" // not a comment"}"#).unwrap();
        assert_eq!(parsed["key"], "a \" // not a comment");
    }

    #[test]
    fn test_bom_stripped() {
        let parsed = parse("\u{feff}{\"key\": 1}").unwrap();
        assert_eq!(parsed["key"], 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse("{not json").is_err());
    }
}
