//! Markdown cleanup run on AI-generated text before it reaches the parser.

use once_cell::sync::Lazy;
use regex::Regex;

/// (pattern, replacement) pairs applied in order. Order matters: `**bold**`
/// must be unwrapped before the single-star italic rule sees it.
static MARKDOWN_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?m)^#{1,6}\s+", ""),
        (r"\*\*([^*]+)\*\*", "$1"),
        (r"\*([^*]+)\*", "$1"),
        (r"__([^_]+)__", "$1"),
        (r"_([^_]+)_", "$1"),
        (r"(?m)^[-*]\s+", "- "),
        (r"(?m)^---+$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"));
        (regex, replacement)
    })
    .collect()
});

/// Removes heading markers, emphasis and horizontal rules, and normalizes
/// list markers to `- ` so the plain-text parser sees ordinary lines.
pub fn strip_markdown(text: &str) -> String {
    let stripped = MARKDOWN_RULES
        .iter()
        .fold(text.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).into_owned()
        });
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_headings_and_emphasis() {
        let text = "# Jane Doe\n## **Experience**\nBuilt *fast* __things__ with _care_";
        assert_eq!(
            strip_markdown(text),
            "Jane Doe\nExperience\nBuilt fast things with care"
        );
    }

    #[test]
    fn test_normalizes_list_markers() {
        assert_eq!(strip_markdown("*   one\n-  two"), "- one\n- two");
    }

    #[test]
    fn test_removes_horizontal_rules() {
        assert_eq!(strip_markdown("Jane\n---\nSKILLS"), "Jane\n\nSKILLS");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "Jane Doe\njane@x.com | 555-000-1111";
        assert_eq!(strip_markdown(text), text);
    }
}
