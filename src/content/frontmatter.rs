//! Front-matter parsing
//!
//! Front matter is a block of `key: value` lines fenced by `---` lines at the
//! very top of a post. It is scanned line by line rather than parsed as YAML:
//! each line is split on its first colon, so values may contain further
//! colons and nested structures are not supported.

const DELIMITER: &str = "---";

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub author: Option<String>,
    /// Recognized but superseded by the date in the file name
    pub date: Option<String>,
    /// Recognized but superseded by the title in the file name
    pub title: Option<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// When the opening `---` has no matching closing line the whole input is
    /// returned as the body, opening delimiter included.
    pub fn parse(content: &str) -> (Self, String) {
        let lines: Vec<&str> = content.split('\n').collect();

        if lines[0].trim_end() != DELIMITER {
            return (FrontMatter::default(), content.to_string());
        }

        let Some(end) = lines
            .iter()
            .skip(1)
            .position(|line| line.trim() == DELIMITER)
            .map(|pos| pos + 1)
        else {
            return (FrontMatter::default(), content.to_string());
        };

        let mut fm = FrontMatter::default();
        for line in &lines[1..end] {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = unquote(value.trim()).to_string();
            match key.trim().to_lowercase().as_str() {
                "author" => fm.author = Some(value),
                "date" => fm.date = Some(value),
                "title" => fm.title = Some(value),
                other => tracing::trace!("Ignoring front-matter key {:?}", other),
            }
        }

        (fm, lines[end + 1..].join("\n"))
    }
}

/// Strip one pair of surrounding double quotes
fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter() {
        let content = "---\nauthor: \"Ada Lovelace\"\ndate: 1843-09-01\n---\n# Notes\n\nBody text.\n";

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.author.as_deref(), Some("Ada Lovelace"));
        assert_eq!(fm.date.as_deref(), Some("1843-09-01"));
        assert_eq!(body, "# Notes\n\nBody text.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just Markdown\n\n---\n\nMore.";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_frontmatter_is_body() {
        let content = "---\nauthor: Someone\n\nNo closing delimiter here.";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.author, None);
        assert_eq!(body, content);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let content = "---\nAuthor: Grace Hopper\nTITLE: Ignored\n---\nbody";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.author.as_deref(), Some("Grace Hopper"));
        assert_eq!(fm.title.as_deref(), Some("Ignored"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let content = "---\nauthor: Dr. Who: The Doctor\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.author.as_deref(), Some("Dr. Who: The Doctor"));
    }

    #[test]
    fn test_malformed_and_unknown_lines_ignored() {
        let content = "---\njust some words\ntags: a, b\n  author :   plain  \n---\ntext";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.author.as_deref(), Some("plain"));
        assert_eq!(fm.date, None);
        assert_eq!(body, "text");
    }

    #[test]
    fn test_only_one_quote_layer_stripped() {
        let content = "---\nauthor: \"\"quoted\"\"\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.author.as_deref(), Some("\"quoted\""));

        let content = "---\nauthor: \"unbalanced\n---\n";
        let (fm, _) = FrontMatter::parse(content);
        assert_eq!(fm.author.as_deref(), Some("\"unbalanced"));
    }

    #[test]
    fn test_closing_delimiter_may_have_whitespace() {
        let content = "---\r\nauthor: Win\r\n  ---  \r\nbody\r\n";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.author.as_deref(), Some("Win"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_longer_rule_is_not_a_delimiter() {
        let content = "----\nauthor: x\n---\nbody";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.author, None);
        assert_eq!(body, content);
    }
}
