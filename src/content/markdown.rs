//! Markdown rendering with syntax highlighting

use linkify::{LinkFinder, LinkKind};
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::error::{BlogError, Result};

/// Markdown renderer with syntax highlighting
///
/// Built once at start-up and only ever borrowed immutably afterwards, so a
/// single instance can be shared between request handlers.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
    line_numbers: bool,
    link_finder: LinkFinder,
}

/// A fenced code block being collected
struct FencedBlock {
    lang: Option<String>,
    code: String,
}

impl MarkdownRenderer {
    /// Create with custom settings
    ///
    /// `theme` must name one of syntect's bundled themes.
    pub fn with_options(theme: &str, line_numbers: bool) -> Result<Self> {
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set.themes.remove(theme).ok_or_else(|| {
            let mut known: Vec<_> = theme_set.themes.keys().cloned().collect();
            known.sort();
            BlogError::Config(format!(
                "Unknown highlight theme {:?}, available: {}",
                theme,
                known.join(", ")
            ))
        })?;

        // `www.` links carry no scheme; bare domains are filtered out later
        let mut link_finder = LinkFinder::new();
        link_finder.url_must_have_scheme(false);

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
            line_numbers,
            link_finder,
        })
    }

    /// Create from the `highlight` section of the site config
    pub fn from_config(config: &HighlightConfig) -> Result<Self> {
        Self::with_options(&config.theme, config.line_number)
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // GitHub flavoured markdown: tables, strikethrough, task lists and
        // (via the linkify pass) bare URLs and e-mail addresses
        let options =
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        let parser = TextMergeStream::new(Parser::new_ext(markdown, options));

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<FencedBlock> = None;
        let mut link_depth = 0usize;
        let mut in_indented_code = false;

        for event in parser {
            if let Some(block) = code_block.as_mut() {
                match event {
                    Event::Text(text) => block.code.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(&block.code, block.lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    let lang = info.split_whitespace().next().map(str::to_string);
                    code_block = Some(FencedBlock {
                        lang,
                        code: String::new(),
                    });
                }
                Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)) => {
                    in_indented_code = true;
                    events.push(event);
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_indented_code = false;
                    events.push(event);
                }
                Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => {
                    link_depth += 1;
                    events.push(event);
                }
                Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1);
                    events.push(event);
                }
                Event::Text(text) if link_depth == 0 && !in_indented_code => {
                    self.push_linkified(text, &mut events);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Push a text run, splitting out bare URLs and e-mail addresses as links
    fn push_linkified<'a>(&self, text: CowStr<'a>, events: &mut Vec<Event<'a>>) {
        if self.link_finder.links(&text).next().is_none() {
            events.push(Event::Text(text));
            return;
        }

        let mut plain = String::new();
        for span in self.link_finder.spans(&text) {
            let dest = match span.kind() {
                Some(LinkKind::Email) => Some(format!("mailto:{}", span.as_str())),
                Some(LinkKind::Url) => autolink_target(span.as_str()),
                _ => None,
            };

            let Some(dest) = dest else {
                plain.push_str(span.as_str());
                continue;
            };

            if !plain.is_empty() {
                events.push(Event::Text(CowStr::from(std::mem::take(&mut plain))));
            }
            events.push(Event::Start(Tag::Link {
                link_type: LinkType::Autolink,
                dest_url: CowStr::from(dest),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            }));
            events.push(Event::Text(CowStr::from(span.as_str().to_string())));
            events.push(Event::End(TagEnd::Link));
        }

        if !plain.is_empty() {
            events.push(Event::Text(CowStr::from(plain)));
        }
    }

    /// Highlight a fenced code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> Result<String> {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
            .map_err(|e| BlogError::Render(format!("Failed to highlight {} block: {}", lang, e)))?;

        let lang = html_escape(lang);
        if self.line_numbers {
            Ok(self.add_line_numbers(code, &highlighted, &lang))
        } else {
            Ok(format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                lang, highlighted
            ))
        }
    }

    /// Put a line-number gutter next to highlighted code
    fn add_line_numbers(&self, code: &str, highlighted: &str, lang: &str) -> String {
        let gutter = (1..=code.lines().count().max(1))
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<figure class="highlight language-{}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            lang, gutter, highlighted
        )
    }
}

/// Link target for a URL found in plain text
///
/// Only `http://`, `https://` and `www.` links qualify; `www.` links get an
/// `http://` scheme. Bare domains such as `example.com` stay text.
fn autolink_target(url: &str) -> Option<String> {
    let has_prefix = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };

    if has_prefix("http://") || has_prefix("https://") {
        Some(url.to_string())
    } else if has_prefix("www.") {
        Some(format!("http://{}", url))
    } else {
        None
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::with_options("InspiredGitHub", false).unwrap()
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = renderer().render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let html = renderer()
            .render("```rust\nfn main() {\n    let x = 1;\n}\n```")
            .unwrap();
        assert!(html.contains(r#"<div class="highlight language-rust">"#));
        assert!(html.contains("<pre style="));
        assert!(html.matches("<span style=").count() > 1);
        assert!(!html.contains("<code"));
    }

    #[test]
    fn test_code_block_text_is_escaped() {
        let html = renderer().render("```html\n<b>&</b>\n```").unwrap();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let html = renderer().render("```nosuchlang\nplain words\n```").unwrap();
        assert!(html.contains("language-nosuchlang"));
        assert!(html.contains("plain words"));
    }

    #[test]
    fn test_indented_code_is_not_highlighted() {
        let html = renderer().render("Para.\n\n    indented code\n").unwrap();
        assert!(html.contains("<pre><code>indented code"));
        assert!(!html.contains("highlight"));
    }

    #[test]
    fn test_urls_in_indented_code_untouched() {
        let html = renderer().render("    see https://example.com
").unwrap();
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_line_numbers() {
        let renderer = MarkdownRenderer::with_options("InspiredGitHub", true).unwrap();
        let html = renderer.render("```python\na = 1\nb = 2\n```").unwrap();
        assert!(html.contains(r#"<td class="gutter">"#));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
        assert!(!html.contains(r#"<span class="line-number">3</span>"#));
    }

    #[test]
    fn test_gfm_table_and_strikethrough() {
        let md = "| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~";
        let html = renderer().render(md).unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_gfm_task_list() {
        let html = renderer().render("- [x] done\n- [ ] todo\n").unwrap();
        assert!(html.contains("checkbox"));
        assert!(html.contains("checked"));
    }

    #[test]
    fn test_bare_urls_are_linked() {
        let html = renderer()
            .render("Read https://example.com/paper.pdf today.")
            .unwrap();
        assert!(html.contains(r#"<a href="https://example.com/paper.pdf">https://example.com/paper.pdf</a>"#));
    }

    #[test]
    fn test_urls_in_code_and_links_untouched() {
        let html = renderer()
            .render("`https://example.com` and [site](https://example.org) ")
            .unwrap();
        assert!(html.contains("<code>https://example.com</code>"));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_www_links_get_http_scheme() {
        let html = renderer().render("Mirror at www.example.org/data").unwrap();
        assert!(html.contains(r#"<a href="http://www.example.org/data">www.example.org/data</a>"#));
    }

    #[test]
    fn test_trailing_punctuation_not_linked() {
        let html = renderer().render("See https://example.com/a.").unwrap();
        assert!(html.contains(r#"<a href="https://example.com/a">https://example.com/a</a>.</p>"#));
    }

    #[test]
    fn test_bare_domain_not_linked() {
        let html = renderer().render("Hosted on example.com today.").unwrap();
        assert!(!html.contains("<a "));
        assert!(html.contains("Hosted on example.com today."));
    }

    #[test]
    fn test_email_addresses_are_linked() {
        let html = renderer().render("email foo@example.com").unwrap();
        assert!(html.contains(r#"<a href="mailto:foo@example.com">foo@example.com</a>"#));
        assert!(html.starts_with("<p>email "));
    }

    #[test]
    fn test_autolink_target() {
        assert_eq!(autolink_target("HTTPS://a.org").as_deref(), Some("HTTPS://a.org"));
        assert_eq!(autolink_target("www.a.org").as_deref(), Some("http://www.a.org"));
        assert_eq!(autolink_target("ftp://a.org"), None);
        assert_eq!(autolink_target("a.org"), None);
        assert_eq!(autolink_target("ww"), None);
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let err = MarkdownRenderer::with_options("no-such-theme", false).err();
        assert!(matches!(err, Some(BlogError::Config(_))));
    }
}
