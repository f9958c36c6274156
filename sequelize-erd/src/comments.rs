//! Comment removal for JavaScript/TypeScript source text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// String literals are matched alongside comments so that a `//` inside a
/// quoted URL is skipped over rather than treated as the start of a comment.
static COMMENT_OR_STRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)"(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'|`(?:\\.|[^`\\])*`|//[^\r\n]*|/\*.*?\*/"#,
    )
    .expect("comment pattern is valid")
});

/// Remove `//` line comments and `/* */` block comments.
///
/// Everything else, including the line break that ends a line comment, is
/// left untouched.
pub fn strip_comments(text: &str) -> String {
    COMMENT_OR_STRING
        .replace_all(text, |caps: &Captures<'_>| {
            let matched = &caps[0];
            if matched.starts_with("//") || matched.starts_with("/*") {
                String::new()
            } else {
                matched.to_string()
            }
        })
        .into_owned()
}
