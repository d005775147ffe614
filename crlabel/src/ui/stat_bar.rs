//! Top bar: which target is loaded and the annotator's running stats.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crlabel_core::types::Target;

use crate::app::AppState;
use crate::theme::Theme;

/// `"<id>: <url tail>"` for a loaded target; `"Loading..."` stands in for a
/// missing identifier.
pub fn target_caption(target: Option<&Target>) -> String {
    let mut caption = match target.and_then(|t| t.identifier.as_deref()) {
        Some(id) => format!("{id}: "),
        None => "Loading...".to_owned(),
    };
    if let Some(tail) = target.and_then(Target::url_tail) {
        caption.push_str(tail);
    }
    caption
}

pub fn render_stat_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let session = state.session.state();
    let info = session.info();
    let [alpha, total, mine] = info.stat_lines();

    let right = Line::from(vec![
        Span::styled(
            format!("{} ", info.annotator_identity),
            Style::default().fg(theme.identity).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("│ {alpha} │ {total} │ {mine} ")),
    ])
    .right_aligned();
    let width = u16::try_from(right.width()).unwrap_or(u16::MAX);

    let [left_area, right_area] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(width)]));

    let style = Style::default().bg(theme.stat_bar_bg).fg(theme.stat_bar_fg);
    let caption = Line::from(Span::styled(
        format!(" {}", target_caption(session.target())),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(caption).style(style), left_area);
    frame.render_widget(Paragraph::new(right).style(style), right_area);
}
