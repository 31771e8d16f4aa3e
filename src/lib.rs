//! academic-blog: serves a directory of Markdown posts as HTML pages
//!
//! Every request re-reads the posts directory: the index lists posts derived
//! from `YYYY-MM-DD-slug.md` file names and each post page renders the file's
//! Markdown, with highlighted code blocks and MathJax loaded client-side.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod server;
pub mod templates;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{MarkdownRenderer, Post, PostSummary};
use error::Result;
use templates::TemplateRenderer;

pub use error::BlogError;

/// The main blog application
///
/// Holds the configuration plus the Markdown and template renderers, which
/// are built once and shared read-only between requests.
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the Markdown posts
    pub posts_dir: PathBuf,
    markdown: Arc<MarkdownRenderer>,
    templates: Arc<TemplateRenderer>,
}

impl Blog {
    /// Create a new Blog instance from a directory, reading `_config.yml`
    /// when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Create a Blog with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.posts_dir);
        let markdown = MarkdownRenderer::from_config(&config.highlight)?;
        let templates = TemplateRenderer::new(&config)?;

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            markdown: Arc::new(markdown),
            templates: Arc::new(templates),
        })
    }

    /// List posts in the configured order
    pub fn list_posts(&self) -> Result<Vec<PostSummary>> {
        let mut posts = content::list_posts(&self.posts_dir)?;
        content::sort_posts(&mut posts, self.config.order_by);
        Ok(posts)
    }

    /// Render one post by file name
    pub fn render_post(&self, file_name: &str) -> Result<Post> {
        content::render_post(&self.posts_dir, file_name, &self.markdown)
    }

    /// Full HTML of the index page
    pub fn index_page(&self) -> Result<String> {
        let posts = self.list_posts()?;
        self.templates.render_index(&posts)
    }

    /// Full HTML of a post page
    pub fn post_page(&self, file_name: &str) -> Result<String> {
        let post = self.render_post(file_name)?;
        self.templates.render_post(&post)
    }
}
