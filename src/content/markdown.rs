//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Marker separating a post's excerpt from the rest of its body
pub const MORE_MARKER: &str = "<!-- more -->";

const DEFAULT_THEME: &str = "base16-ocean.dark";

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
        Self::with_options(DEFAULT_THEME, true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_name = if theme_set.themes.contains_key(theme) {
            theme.to_string()
        } else {
            tracing::warn!(
                "Unknown highlight theme '{}', falling back to {}",
                theme,
                DEFAULT_THEME
            );
            DEFAULT_THEME.to_string()
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name,
            line_numbers,
        }
    }

    /// Render markdown to an HTML fragment
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, parser_options());

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            if let Some((lang, code)) = code_block.as_mut() {
                match event {
                    Event::End(TagEnd::CodeBlock) => {
                        let highlighted = self.highlight_code(code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                        code_block = None;
                    }
                    Event::Text(text) => code.push_str(&text),
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme()
            .and_then(|theme| highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok());

        match highlighted {
            Some(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Some(highlighted) => highlighted,
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }

    /// Split the body at [`MORE_MARKER`].
    ///
    /// Returns the excerpt (if the marker is present) and the body with the
    /// marker removed. A marker inside a code block or code span is text,
    /// not a marker.
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        let marker = Parser::new_ext(content, parser_options())
            .into_offset_iter()
            .find_map(|(event, range)| match event {
                Event::Html(html) | Event::InlineHtml(html) if html.contains(MORE_MARKER) => {
                    content[range.clone()]
                        .find(MORE_MARKER)
                        .map(|offset| range.start + offset)
                }
                _ => None,
            });

        if let Some(pos) = marker {
            let excerpt = content[..pos].trim().to_string();
            let remaining = content[pos + MORE_MARKER.len()..].trim();
            let full = format!("{}\n\n{}", excerpt, remaining);
            (Some(excerpt), full)
        } else {
            (None, content.to_string())
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// Front-matter is split off before rendering, so no metadata blocks
fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Wrap highlighted code in a table with a line-number gutter
fn add_line_numbers(code: &str, lang: &str) -> String {
    let gutter = (1..=code.lines().count())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");
    let code_lines = code.lines().collect::<Vec<_>>().join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        html_escape(lang),
        gutter,
        code_lines
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
