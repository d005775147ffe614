//! Screen layout for crlabel.
//!
//! Pure layout arithmetic, recomputed inside every `terminal.draw()` so the
//! regions always follow the live terminal size.
//!
//! ```text
//! ┌ stat bar (1 row) ──────────────────────────────┐
//! │ diff panel (fills)                             │
//! │ label bar (3 rows, bordered)                   │
//! └ status line (1 row) ───────────────────────────┘
//! ```

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
};

use crlabel_core::session::Phase;

use crate::app::AppState;
use crate::theme::Theme;

/// Returns `[stat_bar, diff, label_bar, status_line]` for the current frame.
pub fn compute_layout(frame: &Frame) -> [Rect; 4] {
    frame.area().layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ]))
}

/// The area inside a panel's 1-cell border.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Bordered block for a panel; thick border while the panel is live.
pub fn panel_block<'a>(title: Line<'a>, active: bool, theme: &Theme) -> Block<'a> {
    let (border_type, color) = if active {
        (BorderType::Thick, theme.border_active)
    } else {
        (BorderType::Plain, theme.border_inactive)
    };
    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
}

/// Renders the 1-row status line: what the session is doing and, when stalled,
/// why and how to retry. Never blank.
pub fn render_status_line(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme, now: Instant) {
    let session = state.session.state();
    let mut spans = Vec::new();

    let (text, fg) = match session.phase() {
        Phase::Acquiring { pending: Some(_), attempt: 0 } => ("loading target".to_owned(), theme.stat_bar_fg),
        Phase::Acquiring { pending: Some(_), attempt } => {
            (format!("loading target (retry {attempt})"), theme.lock_pending)
        }
        Phase::Acquiring { pending: None, .. } => ("stalled".to_owned(), theme.error),
        Phase::AwaitingRead => match state.lock_remaining(now) {
            Some(left) => (format!("reading… {:.1}s", left.as_secs_f32()), theme.lock_pending),
            None => ("reading…".to_owned(), theme.lock_pending),
        },
        Phase::Ready => ("ready".to_owned(), theme.label_enabled),
        Phase::Submitting { label, .. } => (format!("submitting {}…", label.wire_name()), theme.lock_pending),
    };
    spans.push(Span::styled(format!(" {text} "), Style::default().fg(fg).add_modifier(Modifier::BOLD)));

    if let Some(error) = session.last_error() {
        spans.push(Span::styled(format!(" {error} "), Style::default().fg(theme.error)));
        if session.is_stalled() {
            spans.push(Span::raw(" r retry "));
        }
    }
    spans.push(Span::raw(format!(" labeled {} ", session.submission_count())));
    spans.push(Span::styled(" ? help  q quit ", Style::default().fg(theme.border_inactive)));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.stat_bar_bg).fg(theme.stat_bar_fg)),
        area,
    );
}
