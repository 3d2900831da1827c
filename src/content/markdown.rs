//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::ContentEntry;
use crate::config::HighlightConfig;

/// Produces the HTML body of an entry
pub trait EntryRenderer: Send + Sync {
    /// Render `entry.body`. `entry.rendered` is not filled in yet.
    fn render_entry(&self, entry: &ContentEntry) -> Result<String>;
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::with_options(&config.theme, config.line_number)
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            // Info strings like "rust,ignore" or "js title=x"
                            let lang = lang
                                .split(|c: char| c == ',' || c.is_whitespace())
                                .next()
                                .unwrap_or_default()
                                .to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                _ => {
                    if !in_code_block {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");
        let lines = match self.highlight_lines(code, lang) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::debug!("Falling back to plain code block for {}: {}", lang, e);
                code.split_inclusive('\n').map(html_escape).collect()
            }
        };

        let mut html = format!(r#"<pre class="highlight"><code class="language-{}">"#, lang);
        for (n, line) in lines.iter().enumerate() {
            if self.line_numbers {
                html.push_str(&format!(
                    r#"<span class="line"><span class="line-number">{}</span>{}</span>"#,
                    n + 1,
                    line
                ));
            } else {
                html.push_str(line);
            }
        }
        html.push_str("</code></pre>");
        html
    }

    /// One HTML fragment per source line, newline included
    fn highlight_lines(&self, code: &str, lang: &str) -> Result<Vec<String>> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
            .ok_or_else(|| anyhow::anyhow!("no highlighting themes loaded"))?;

        let mut highlighter = HighlightLines::new(syntax, theme);
        LinesWithEndings::from(code)
            .map(|line| -> Result<String> {
                let regions = highlighter.highlight_line(line, &self.syntax_set)?;
                Ok(styled_line_to_highlighted_html(
                    &regions,
                    IncludeBackground::No,
                )?)
            })
            .collect()
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryRenderer for MarkdownRenderer {
    fn render_entry(&self, entry: &ContentEntry) -> Result<String> {
        self.render(&entry.body)
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
