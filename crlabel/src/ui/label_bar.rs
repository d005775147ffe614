//! Bottom label bar: one button per label in hotkey order.
//!
//! Button areas are recorded in `AppState::label_rects` on every frame so a
//! mouse click can be mapped back to a label.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crlabel_core::types::Label;

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

pub fn button_caption(label: Label) -> String {
    format!(" {} {} ", label.hotkey(), label.display_name())
}

pub fn render_label_bar(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme, now: Instant) {
    let session = state.session.state();
    let gate = session.gate();

    let title = match state.lock_remaining(now) {
        Some(left) => Line::from(vec![
            Span::raw(" Labels  "),
            Span::styled(
                format!("unlocks in {:.1}s ", left.as_secs_f32()),
                Style::default().fg(theme.lock_pending),
            ),
        ]),
        None => Line::from(" Labels "),
    };
    let block = panel_block(title, gate.has_target && !gate.locked && !gate.submitting, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    let widths: Vec<Constraint> = Label::ALL
        .iter()
        .map(|&l| Constraint::Length(button_caption(l).chars().count() as u16 + 1))
        .collect();
    let cells = Layout::horizontal(widths).split(inner);

    let selected = state.selected_label();
    let mut rects = Vec::with_capacity(Label::ALL.len());
    for (&label, &cell) in Label::ALL.iter().zip(cells.iter()) {
        let enabled = gate.allows(label);
        let fg = match (enabled, label) {
            (false, _) => theme.label_disabled,
            (true, Label::Skip) => theme.label_skip,
            (true, _) => theme.label_enabled,
        };
        let mut style = Style::default().fg(fg);
        if enabled {
            style = style.add_modifier(Modifier::BOLD);
        } else {
            style = style.add_modifier(Modifier::DIM);
        }
        if label == selected {
            style = style.bg(theme.label_cursor_bg);
        }
        frame.render_widget(Paragraph::new(Span::styled(button_caption(label), style)), cell);
        rects.push((label, cell));
    }
    state.label_rects = rects;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captions_carry_hotkey_and_display_name() {
        assert_eq!(button_caption(Label::FalsePositive), " 3 false positive ");
        assert_eq!(button_caption(Label::Skip), " 6 SKIP ");
    }
}
