//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use syntect_assets::assets::HighlightingAssets;

/// Default URL prefix prepended to image paths
pub const DEFAULT_ASSET_PREFIX: &str = "/assets";

/// Markdown renderer with syntax highlighting and image path rewriting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    asset_prefix: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false, DEFAULT_ASSET_PREFIX)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool, asset_prefix: &str) -> Self {
        Self {
            syntax_set: load_syntax_set(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
            asset_prefix: asset_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // Some(lang) while inside a code block
        let mut code_block: Option<Option<String>> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c.is_whitespace() || c == ',')
                            .next()
                            .filter(|lang| !lang.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(lang) = code_block.take() {
                        let highlighted = self.highlight_code(&code_block_content, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    events.push(Event::Start(Tag::Image {
                        link_type,
                        dest_url: CowStr::from(self.rewrite_image_url(&dest_url)),
                        title,
                        id,
                    }));
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        html_output
    }

    /// Point an authored image path at the asset mount.
    ///
    /// This is not a plain `prefix + path` concatenation. The prefix and the
    /// path are joined with exactly one `/`, whether or not the path starts
    /// with one, so `img/a.png` and `/img/a.png` both become
    /// `/assets/img/a.png`. Destinations with a URL scheme (`https:`,
    /// `data:`, ...) or starting with `//` are returned unchanged.
    pub fn rewrite_image_url(&self, dest: &str) -> String {
        if is_external_url(dest) {
            return dest.to_string();
        }
        format!("{}/{}", self.asset_prefix, dest.trim_start_matches('/'))
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight a code block, or emit it verbatim when the language is unknown
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let Some(lang) = lang else {
            return plain_code_block(code, None);
        };

        let (Some(syntax), Some(theme)) = (self.find_syntax(lang), self.theme()) else {
            tracing::debug!("No highlighter for language {:?}, emitting code as-is", lang);
            return plain_code_block(code, Some(lang));
        };

        match self.highlight_lines(code, syntax, theme) {
            Ok(lines) => {
                if self.line_numbers {
                    add_line_numbers(&lines, lang)
                } else {
                    format!(
                        r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
                        html_escape(lang),
                        lines.concat()
                    )
                }
            }
            Err(e) => {
                tracing::warn!("Failed to highlight {} code block: {}", lang, e);
                plain_code_block(code, Some(lang))
            }
        }
    }

    /// Highlighted HTML per source line, each keeping its line ending
    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<Vec<String>, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        LinesWithEndings::from(code)
            .map(|line| {
                let regions = highlighter.highlight_line(line, &self.syntax_set)?;
                styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)
            })
            .collect()
    }
}

/// The bundled syntax set, which covers TypeScript, TSX and JSX on top of
/// the syntect defaults
fn load_syntax_set() -> SyntaxSet {
    match HighlightingAssets::from_binary().get_syntax_set() {
        Ok(syntax_set) => syntax_set.clone(),
        Err(e) => {
            tracing::warn!("Failed to load bundled syntaxes, using defaults: {}", e);
            SyntaxSet::load_defaults_newlines()
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Code block without any highlight markup
fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>", html_escape(code)),
    }
}

/// Add line numbers to highlighted code
fn add_line_numbers(lines: &[String], lang: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");
    let code_lines = lines
        .iter()
        .map(|line| line.replace(['\n', '\r'], ""))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        html_escape(lang),
        gutter,
        code_lines
    )
}

/// URLs with a scheme or protocol-relative URLs are not served from the asset mount
fn is_external_url(url: &str) -> bool {
    if url.starts_with("//") {
        return true;
    }
    match url.find(':') {
        Some(colon) => {
            let scheme = &url[..colon];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
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
