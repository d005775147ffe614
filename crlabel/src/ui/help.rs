//! Help overlay: labeling guidelines, what the stats mean, and keys.
//!
//! Drawn last inside the same `terminal.draw()` closure, over a `Clear`ed
//! area, so it sits on top of every panel.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crlabel_core::types::{Label, SessionInfo};

use crate::theme::Theme;

pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16, info: &SessionInfo) {
    // Too narrow for a readable overlay.
    if frame.area().width < 40 || frame.area().height < 10 {
        return;
    }
    let area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Help  j/k scroll, ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(info))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        area,
    );
}

fn heading(text: &str) -> Line<'static> {
    Line::styled(text.to_owned(), Style::default().add_modifier(Modifier::BOLD))
}

pub fn build_help_text(info: &SessionInfo) -> Text<'static> {
    let mut lines = vec![heading("Labels")];
    for label in Label::ALL {
        lines.push(Line::from(format!("  {}  {}", label.hotkey(), label.display_name())));
        for bullet in label.help() {
            lines.push(Line::from(format!("       - {bullet}")));
        }
    }
    lines.push(Line::from("  Every label except SKIP unlocks once the comment has been read."));

    lines.push(Line::default());
    lines.push(heading("Stats"));
    lines.extend(info.stat_lines().into_iter().map(|s| Line::from(format!("  {s}"))));

    lines.push(Line::default());
    lines.extend([
        heading("Keys"),
        Line::from("  1-6            Submit label"),
        Line::from("  h / l, ← / →   Move label cursor"),
        Line::from("  Enter, Space   Submit label under cursor"),
        Line::from("  j / k          Scroll down / up one line"),
        Line::from("  g / G          Jump to top / bottom"),
        Line::from("  Ctrl-d / u     Scroll half page down / up"),
        Line::from("  Ctrl-f / b     Scroll full page down / up"),
        Line::from("  [ / ]          Previous / next change"),
        Line::from("  c              Centre on the comment"),
        Line::from("  r              Retry loading the target"),
        Line::from("  ?              Open / close this help"),
        Line::from("  q / Esc        Quit"),
    ]);
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_lists_every_label_and_the_stats() {
        let info = SessionInfo { agreement_score: 0.5, ..SessionInfo::default() };
        let text: Vec<String> = build_help_text(&info)
            .lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        for label in Label::ALL {
            assert!(text.iter().any(|l| l.contains(label.display_name())));
        }
        assert!(text.iter().any(|l| l == "  Kirpendorff's alpha: 0.500"));
    }
}
