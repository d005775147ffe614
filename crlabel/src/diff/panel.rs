//! `DiffSurface` implementation backing the centre panel.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use similar::{ChangeTag, DiffTag, InlineChange, TextDiff};

use crlabel_core::feed::DiffSurface;
use crlabel_core::types::Side;

use crate::diff::highlight::SideHighlighter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Context,
    Added,
    Removed,
    /// One line of the review comment, anchored under its target line.
    Note,
}

/// One display row, fully owned so it can live in `AppState` across frames.
#[derive(Debug, Clone)]
pub struct DiffRow {
    pub kind: RowKind,
    /// 1-based line number in the before document.
    pub old_lineno: Option<u32>,
    /// 1-based line number in the after document.
    pub new_lineno: Option<u32>,
    pub spans: Vec<Span<'static>>,
    /// Inside the commented range on the active side.
    pub in_comment_range: bool,
}

impl DiffRow {
    pub fn lineno(&self, side: Side) -> Option<u32> {
        match side {
            Side::Parent => self.old_lineno,
            Side::Revision => self.new_lineno,
        }
    }
}

/// Whole-file line diff with the review comment spliced in.
#[derive(Debug, Default)]
pub struct DiffPanel {
    syntax: String,
    rows: Vec<DiffRow>,
    /// Row index where each run of changed lines starts.
    change_offsets: Vec<usize>,
    /// Row the comment note is attached to.
    anchor_row: Option<usize>,
    active: Side,
}

impl DiffPanel {
    pub fn new(syntax: &str) -> Self {
        Self {
            syntax: syntax.to_owned(),
            ..Self::default()
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.change_offsets.clear();
        self.anchor_row = None;
    }

    pub fn rows(&self) -> &[DiffRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn change_offsets(&self) -> &[usize] {
        &self.change_offsets
    }

    pub fn anchor_row(&self) -> Option<usize> {
        self.anchor_row
    }

    pub fn active_side(&self) -> Side {
        self.active
    }
}

impl DiffSurface for DiffPanel {
    fn render(&mut self, before: &str, after: &str, active: Side) {
        self.clear();
        self.active = active;

        let diff = TextDiff::from_lines(before, after);
        let mut old_h = SideHighlighter::new(&self.syntax);
        let mut new_h = SideHighlighter::new(&self.syntax);

        for op in diff.ops() {
            if op.tag() != DiffTag::Equal {
                self.change_offsets.push(self.rows.len());
            }
            for change in diff.iter_inline_changes(op) {
                let line: String = change.iter_strings_lossy().map(|(_, s)| s).collect();
                let code = line.trim_end_matches(['\n', '\r']);
                let old_lineno = change.old_index().map(to_lineno);
                let new_lineno = change.new_index().map(to_lineno);

                let (kind, spans) = match change.tag() {
                    ChangeTag::Equal => {
                        old_h.line(code);
                        (RowKind::Context, new_h.line(code))
                    }
                    ChangeTag::Delete => {
                        old_h.line(code);
                        (RowKind::Removed, emphasis_spans(&change, Color::Red))
                    }
                    ChangeTag::Insert => {
                        new_h.line(code);
                        (RowKind::Added, emphasis_spans(&change, Color::Green))
                    }
                };
                self.rows.push(DiffRow {
                    kind,
                    old_lineno,
                    new_lineno,
                    spans,
                    in_comment_range: false,
                });
            }
        }
    }

    fn highlight_range(&mut self, side: Side, start: u32, end: u32) {
        for row in &mut self.rows {
            row.in_comment_range = row.kind != RowKind::Note
                && row.lineno(side).is_some_and(|n| (start..=end).contains(&n));
        }
    }

    fn anchor_note(&mut self, side: Side, line: u32, text: &str) {
        let anchor = self
            .rows
            .iter()
            .rposition(|r| r.kind != RowKind::Note && r.lineno(side) == Some(line));
        let insert_at = anchor.map_or(self.rows.len(), |i| i + 1);

        let notes: Vec<DiffRow> = text
            .lines()
            .chain(text.is_empty().then_some(""))
            .map(|l| DiffRow {
                kind: RowKind::Note,
                old_lineno: None,
                new_lineno: None,
                spans: vec![Span::raw(l.to_owned())],
                in_comment_range: false,
            })
            .collect();
        let inserted = notes.len();
        self.rows.splice(insert_at..insert_at, notes);

        for offset in &mut self.change_offsets {
            if *offset >= insert_at {
                *offset += inserted;
            }
        }
        self.anchor_row = Some(anchor.unwrap_or(insert_at));
    }
}

fn to_lineno(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Spans for a changed line with the words that differ from its counterpart
/// in bold.
fn emphasis_spans(change: &InlineChange<'_, str>, color: Color) -> Vec<Span<'static>> {
    change
        .iter_strings_lossy()
        .map(|(emphasized, value)| {
            let text = value.trim_end_matches(['\n', '\r']).to_owned();
            let style = if emphasized {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            Span::styled(text, style)
        })
        .filter(|s| !s.content.is_empty())
        .collect()
}
