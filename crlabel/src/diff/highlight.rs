//! Syntax highlighting for diff rows.
//!
//! Syntect's syntax and theme sets are loaded once and shared. Each side of a
//! diff gets its own stateful highlighter fed every line of that side in order,
//! so multi-line constructs stay correctly colored even when the rows are
//! interleaved with the other side's.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_nonewlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Highlighter for one side of a diff. Plain text when no theme is available.
pub struct SideHighlighter {
    inner: Option<HighlightLines<'static>>,
}

impl SideHighlighter {
    /// `ext` is a file extension such as `"py"`; unknown extensions fall back
    /// to plain text.
    pub fn new(ext: &str) -> Self {
        let syntax = PS
            .find_syntax_by_extension(ext)
            .unwrap_or_else(|| PS.find_syntax_plain_text());
        let theme = TS
            .themes
            .get("base16-ocean.dark")
            .or_else(|| TS.themes.values().next());
        Self {
            inner: theme.map(|t| HighlightLines::new(syntax, t)),
        }
    }

    /// Highlights the next line of this side. Always advances the parser.
    pub fn line(&mut self, code: &str) -> Vec<Span<'static>> {
        let Some(h) = self.inner.as_mut() else {
            return vec![Span::raw(code.to_owned())];
        };
        let ranges = h.highlight_line(code, &PS).unwrap_or_default();
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| syntect_to_span(style, text))
            .collect();
        if spans.is_empty() {
            vec![Span::raw(code.to_owned())]
        } else {
            spans
        }
    }
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Only the foreground is kept; backgrounds belong to the diff view so the
/// comment-range highlight shows through.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    let font = style.font_style;
    if font.contains(syntect::highlighting::FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if font.contains(syntect::highlighting::FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if font.contains(syntect::highlighting::FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}
