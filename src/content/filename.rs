//! Post metadata derived from `YYYY-MM-DD-slug.md` file names

use crate::error::{BlogError, Result};

/// Date and title carried by a post's file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNameMeta {
    /// `YYYY-MM-DD`, taken verbatim from the first three segments
    pub date: String,
    /// The slug with hyphens turned into spaces, title-cased
    pub title: String,
}

impl FileNameMeta {
    /// Parse a file name such as `2024-01-15-my-first-post.md`.
    ///
    /// The final extension is stripped and the stem is split on `-` into at
    /// most four segments; anything other than exactly four is rejected.
    /// The date segments are not checked against the calendar.
    pub fn parse(file_name: &str) -> Result<Self> {
        let stem = strip_extension(file_name);
        let parts: Vec<&str> = stem.splitn(4, '-').collect();
        if parts.len() != 4 {
            return Err(BlogError::InvalidFormat(file_name.to_string()));
        }

        Ok(Self {
            date: format!("{}-{}-{}", parts[0], parts[1], parts[2]),
            title: title_case(&parts[3].replace('-', " ")),
        })
    }
}

/// Drop everything from the last `.` onwards
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) => &file_name[..pos],
        None => file_name,
    }
}

/// Capitalize the first letter or digit of every whitespace-separated word
/// and lower-case the rest.
///
/// Leading punctuation such as `(` does not count as the start of the word,
/// so `(draft)` becomes `(Draft)`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            if c.is_alphanumeric() {
                at_word_start = false;
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_name() {
        let meta = FileNameMeta::parse("2024-01-15-my-first-post.md").unwrap();
        assert_eq!(meta.date, "2024-01-15");
        assert_eq!(meta.title, "My First Post");
    }

    #[test]
    fn test_parse_single_word_slug() {
        let meta = FileNameMeta::parse("2023-12-01-hello.md").unwrap();
        assert_eq!(meta.date, "2023-12-01");
        assert_eq!(meta.title, "Hello");
    }

    #[test]
    fn test_parse_keeps_inner_dots() {
        let meta = FileNameMeta::parse("2024-02-03-release-v1.2-notes.md").unwrap();
        assert_eq!(meta.title, "Release V1.2 Notes");
    }

    #[test]
    fn test_parse_wrong_segment_count() {
        for name in ["notes.md", "2024-01-15.md", "2024-01.md", "", ".md"] {
            let err = FileNameMeta::parse(name).unwrap_err();
            assert!(matches!(err, BlogError::InvalidFormat(_)), "{name}");
        }
    }

    #[test]
    fn test_date_is_not_validated() {
        let meta = FileNameMeta::parse("abcd-ef-gh-odd-name.md").unwrap();
        assert_eq!(meta.date, "abcd-ef-gh");
        assert_eq!(meta.title, "Odd Name");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("my first post"), "My First Post");
        assert_eq!(title_case("SHOUTING title"), "Shouting Title");
        assert_eq!(title_case("don't panic"), "Don't Panic");
        assert_eq!(title_case("(draft) notes"), "(Draft) Notes");
        assert_eq!(title_case("2nd attempt"), "2nd Attempt");
        assert_eq!(title_case("élan vital"), "Élan Vital");
    }
}
