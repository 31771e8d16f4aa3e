//! List posts

use anyhow::Result;
use std::io::{self, Write};

use crate::content::PostSummary;
use crate::Blog;

/// Print every post the index page would show
pub fn run(blog: &Blog, json: bool) -> Result<()> {
    let posts = blog.list_posts()?;
    let stdout = io::stdout();
    write_listing(&posts, json, &mut stdout.lock())
}

/// Write `posts` as a plain listing or as a JSON array
pub fn write_listing<W: Write>(posts: &[PostSummary], json: bool, out: &mut W) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, posts)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Posts ({}):", posts.len())?;
    for post in posts {
        writeln!(out, "  {} - {} [{}]", post.date, post.title, post.file_name)?;
    }

    Ok(())
}
