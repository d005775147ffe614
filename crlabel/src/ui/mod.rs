//! UI rendering for crlabel.
//!
//! `render()` is the single entry point, called once per `AppEvent::Render`
//! inside `terminal.draw()`. Layout arithmetic lives in `layout.rs`; each
//! screen region has its own module.

mod layout;
pub mod diff_view;
pub mod help;
pub mod keybindings;
pub mod label_bar;
pub mod stat_bar;

use std::time::Instant;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, inner_rect, render_status_line};

/// Renders one complete frame: stat bar, diff panel, label bar, status line,
/// and the help overlay on top when it is open.
///
/// The diff viewport height is cached before drawing so scroll keys handled
/// before the next frame use the current size. A pending anchor centring is
/// applied here for the same reason: only now is the height known.
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [stats, diff, labels, status] = compute_layout(frame);
    let now = Instant::now();

    state.diff_viewport_height = inner_rect(diff).height;
    if state.center_pending {
        state.center_on_anchor();
    }

    stat_bar::render_stat_bar(frame, stats, state, theme);
    diff_view::render_diff(frame, diff, state, theme);
    label_bar::render_label_bar(frame, labels, state, theme, now);
    render_status_line(frame, status, state, theme, now);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll, state.session.state().info());
    }
}
