//! Render a single post page without starting the server

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::Blog;

/// Render `file_name` to `output`, or to stdout when no output is given
pub fn run(blog: &Blog, file_name: &str, output: Option<&Path>) -> Result<()> {
    let html = blog
        .post_page(file_name)
        .with_context(|| format!("Failed to render {}", file_name))?;

    match output {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => io::stdout().lock().write_all(html.as_bytes())?,
    }

    Ok(())
}
