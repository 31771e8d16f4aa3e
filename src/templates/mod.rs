//! Built-in page templates using Tera template engine
//!
//! The base layout, the index and post pages and the stylesheet are embedded
//! directly in the binary.

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Post, PostSummary};
use crate::error::Result;

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("style.css", include_str!("style.css")),
            ("layout.html", include_str!("layout.html")),
            ("index.html", include_str!("index.html")),
            ("post.html", include_str!("post.html")),
        ])?;

        Ok(Self {
            tera,
            site: SiteData::from(config),
        })
    }

    /// Render the index page listing `posts` in the given order
    pub fn render_index(&self, posts: &[PostSummary]) -> Result<String> {
        let posts: Vec<PostLink> = posts.iter().map(PostLink::from).collect();

        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("posts", &posts);
        self.render("index.html", &context)
    }

    /// Render a single post page
    pub fn render_post(&self, post: &Post) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("post", post);
        self.render("post.html", &context)
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub footer: String,
    pub language: String,
    pub mathjax_cdn: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            footer: config.footer.clone(),
            language: config.language.clone(),
            mathjax_cdn: config.mathjax_cdn.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostLink {
    pub title: String,
    pub date: String,
    pub url: String,
}

impl From<&PostSummary> for PostLink {
    fn from(summary: &PostSummary) -> Self {
        Self {
            title: summary.title.clone(),
            date: summary.date.clone(),
            url: summary.url(),
        }
    }
}
