//! Error types shared by the content, template and server layers

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while discovering or rendering posts
#[derive(Error, Debug)]
pub enum BlogError {
    /// The posts directory (or another path) could not be read
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file name does not follow `YYYY-MM-DD-slug.md`
    #[error("Invalid post filename format: {0}")]
    InvalidFormat(String),

    /// The requested post does not exist or could not be read
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Markdown conversion or highlighting failed
    #[error("Render error: {0}")]
    Render(String),

    /// Page template could not be built or executed
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// Site configuration is unusable
    #[error("Config error: {0}")]
    Config(String),
}

impl BlogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BlogError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BlogError>;
