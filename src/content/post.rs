//! Post models

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

/// Characters escaped when a file name is placed in a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A post as shown in the index listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    /// Title derived from the file name
    pub title: String,

    /// `YYYY-MM-DD` derived from the file name
    pub date: String,

    /// File name inside the posts directory
    pub file_name: String,
}

impl PostSummary {
    /// Link to the full post
    pub fn url(&self) -> String {
        post_url(&self.file_name)
    }
}

/// A fully rendered post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub title: String,
    pub date: String,

    /// Author from front matter, empty when absent
    pub author: String,

    /// Rendered HTML body; trusted, not sanitized
    pub content_html: String,

    pub file_name: String,
}

impl Post {
    /// The listing entry for this post
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            title: self.title.clone(),
            date: self.date.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

/// `/post/<file name>` with the name percent-encoded
pub fn post_url(file_name: &str) -> String {
    format!("/post/{}", utf8_percent_encode(file_name, PATH_SEGMENT))
}
