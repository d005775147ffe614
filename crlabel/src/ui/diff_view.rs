//! Centre panel: the diff rows built by `DiffPanel`, virtually scrolled.
//!
//! Only `rows[diff_scroll..diff_scroll + height]` are turned into widgets per
//! frame, so long files cost O(viewport) to draw.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
};

use crlabel_core::types::Side;

use crate::app::AppState;
use crate::diff::panel::{DiffRow, RowKind};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

const GUTTER_WIDTH: usize = 4;

pub fn render_diff(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let session = state.session.state();
    let title = match session.target() {
        Some(t) => {
            let (start, end) = t.comment_range();
            let side = match state.diff.active_side() {
                Side::Parent => "before",
                Side::Revision => "after",
            };
            Line::from(format!(" Diff  comment on {side} lines {start}-{end} "))
        }
        None => Line::from(" Diff "),
    };
    let block = panel_block(title, session.target().is_some(), theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if state.diff.is_empty() {
        let msg = if session.is_stalled() {
            "No target loaded. Press r to retry."
        } else {
            "Waiting for the next target..."
        };
        frame.render_widget(List::new([ListItem::new(Line::raw(msg))]), inner);
        return;
    }

    let rows = state.diff.rows();
    let start = state.diff_scroll.min(rows.len().saturating_sub(1));
    let end = (start + usize::from(inner.height)).min(rows.len());
    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|row| ListItem::new(row_line(row, theme)))
        .collect();
    frame.render_widget(List::new(items), inner);
}

fn lineno_cell(n: Option<u32>) -> String {
    match n {
        Some(n) => format!("{n:>GUTTER_WIDTH$}"),
        None => " ".repeat(GUTTER_WIDTH),
    }
}

/// Gutter (old, new, sign) followed by the highlighted code, or the note
/// frame for comment rows.
fn row_line(row: &DiffRow, theme: &Theme) -> Line<'static> {
    let gutter_style = Style::default().fg(theme.diff_gutter);

    if row.kind == RowKind::Note {
        let note_style = Style::default().fg(theme.note_fg);
        let mut spans = vec![
            Span::styled(" ".repeat(GUTTER_WIDTH * 2 + 2), gutter_style),
            Span::styled("┃ ", note_style.add_modifier(Modifier::BOLD)),
        ];
        spans.extend(
            row.spans
                .iter()
                .map(|s| Span::styled(s.content.clone(), note_style.add_modifier(Modifier::ITALIC))),
        );
        return Line::from(spans);
    }

    let (sign, sign_color) = match row.kind {
        RowKind::Added => ("+", theme.diff_added),
        RowKind::Removed => ("-", theme.diff_removed),
        _ => (" ", theme.diff_context),
    };
    let mut spans = vec![
        Span::styled(
            format!("{} {} ", lineno_cell(row.old_lineno), lineno_cell(row.new_lineno)),
            gutter_style,
        ),
        Span::styled(format!("{sign} "), Style::default().fg(sign_color).add_modifier(Modifier::BOLD)),
    ];
    spans.extend(row.spans.iter().cloned());

    let line = Line::from(spans);
    if row.in_comment_range {
        line.style(Style::default().bg(theme.comment_range_bg))
    } else {
        line
    }
}
