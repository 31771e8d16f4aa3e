//! Content loader - lists and renders posts from the posts directory

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::{FileNameMeta, FrontMatter, MarkdownRenderer, Post, PostSummary};
use crate::config::PostOrder;
use crate::error::{BlogError, Result};

/// List every post in `posts_dir`.
///
/// Only regular files directly inside the directory with an `md` extension
/// are considered. Files whose names do not follow `YYYY-MM-DD-slug.md` are
/// skipped with a warning. Entries come back in directory enumeration order.
pub fn list_posts(posts_dir: &Path) -> Result<Vec<PostSummary>> {
    // WalkDir yields nothing for a file root, so check the root up front
    let metadata = fs::metadata(posts_dir).map_err(|e| BlogError::io(posts_dir, e))?;
    if !metadata.is_dir() {
        let source = std::io::Error::other("posts path is not a directory");
        return Err(BlogError::io(posts_dir, source));
    }

    let mut posts = Vec::new();

    for entry in WalkDir::new(posts_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("unreadable posts directory"));
                return Err(BlogError::io(posts_dir, source));
            }
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown_file(path) {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            tracing::warn!("Skipping file with non UTF-8 name: {:?}", path);
            continue;
        };

        match FileNameMeta::parse(file_name) {
            Ok(meta) => posts.push(PostSummary {
                title: meta.title,
                date: meta.date,
                file_name: file_name.to_string(),
            }),
            Err(_) => {
                tracing::warn!("Skipping file with invalid format: {}", file_name);
            }
        }
    }

    tracing::debug!("Found {} posts in {:?}", posts.len(), posts_dir);
    Ok(posts)
}

/// Render the post stored as `file_name` inside `posts_dir`.
///
/// `file_name` must be a bare file name; anything that would resolve outside
/// the posts directory, or to a directory, is an `InvalidFormat` error. A file
/// that cannot be read is `NotFound`. The date and title always come from the
/// file name, whatever the front matter says.
pub fn render_post(posts_dir: &Path, file_name: &str, renderer: &MarkdownRenderer) -> Result<Post> {
    let path = resolve_post_path(posts_dir, file_name)?;

    let bytes = fs::read(&path).map_err(|e| {
        tracing::debug!("Failed to read {:?}: {}", path, e);
        BlogError::NotFound(file_name.to_string())
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let (fm, body) = FrontMatter::parse(&content);
    let content_html = renderer.render(&body)?;

    let meta = FileNameMeta::parse(file_name)?;
    if let Some(date) = fm.date.as_deref().filter(|d| *d != meta.date) {
        tracing::debug!(
            "Ignoring front-matter date {:?} in {}, using {}",
            date,
            file_name,
            meta.date
        );
    }
    if let Some(title) = fm.title.as_deref() {
        tracing::debug!("Ignoring front-matter title {:?} in {}", title, file_name);
    }

    Ok(Post {
        title: meta.title,
        date: meta.date,
        author: fm.author.unwrap_or_default(),
        content_html,
        file_name: file_name.to_string(),
    })
}

/// Sort a listing in place; `PostOrder::None` leaves it untouched
pub fn sort_posts(posts: &mut [PostSummary], order: PostOrder) {
    match order {
        PostOrder::None => {}
        PostOrder::DateAsc => posts.sort_by(compare_dates),
        PostOrder::DateDesc => posts.sort_by(|a, b| compare_dates(b, a)),
        PostOrder::Title => posts.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}

/// Compare as calendar dates where both parse, as strings otherwise
fn compare_dates(a: &PostSummary, b: &PostSummary) -> Ordering {
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    match (parse(a.date.as_str()), parse(b.date.as_str())) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.date.cmp(&b.date),
    }
}

/// Join `file_name` onto `posts_dir`, refusing anything but a plain file name
fn resolve_post_path(posts_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let mut components = Path::new(file_name).components();
    let is_plain_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if !is_plain_name || file_name.contains(|c: char| c == '/' || c == '\\') {
        return Err(BlogError::InvalidFormat(file_name.to_string()));
    }

    let path = posts_dir.join(file_name);
    if path.is_dir() {
        return Err(BlogError::InvalidFormat(file_name.to_string()));
    }

    Ok(path)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
