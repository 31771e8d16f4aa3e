//! Content module - handles posts, front matter and markdown processing

mod filename;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use filename::{title_case, FileNameMeta};
pub use frontmatter::FrontMatter;
pub use loader::{list_posts, render_post, sort_posts};
pub use markdown::MarkdownRenderer;
pub use post::{post_url, Post, PostSummary};
