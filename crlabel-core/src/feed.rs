//! Projects a [`Target`] onto a diff rendering surface.
//!
//! The feed is data-in only: it tells the surface what to paint and never
//! reports anything back to the session.

use crate::types::{Side, Target};

/// A two-sided diff widget.
pub trait DiffSurface {
    /// Replace both documents. `active` is the side the comment lives on.
    fn render(&mut self, before: &str, after: &str, active: Side);
    /// Mark lines `start..=end` (1-based) of `side`.
    fn highlight_range(&mut self, side: Side, start: u32, end: u32);
    /// Attach `text` below `line` (1-based) of `side`.
    fn anchor_note(&mut self, side: Side, line: u32, text: &str);
}

/// Paint `target`: both sides, the commented range, then the comment itself
/// under the last commented line.
pub fn feed<S: DiffSurface + ?Sized>(target: &Target, surface: &mut S) {
    let (start, end) = target.comment_range();
    surface.render(&target.before_text, &target.after_text, target.side);
    surface.highlight_range(target.side, start, end);
    surface.anchor_note(target.side, end, &target.comment_body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recording(Vec<String>);

    impl DiffSurface for Recording {
        fn render(&mut self, before: &str, after: &str, active: Side) {
            self.0.push(format!("render {} {} {active:?}", before.len(), after.len()));
        }
        fn highlight_range(&mut self, side: Side, start: u32, end: u32) {
            self.0.push(format!("highlight {side:?} {start}-{end}"));
        }
        fn anchor_note(&mut self, side: Side, line: u32, text: &str) {
            self.0.push(format!("note {side:?} {line} {text}"));
        }
    }

    #[test]
    fn paints_active_side_range_and_note() {
        let target = Target {
            identifier: Some("c".into()),
            source_url: None,
            before_text: "x\ny\n".into(),
            after_text: "x\n".into(),
            side: Side::Parent,
            comment_range_start: 2,
            comment_range_end: 2,
            comment_body: "drop y?".into(),
        };
        let mut surface = Recording::default();
        feed(&target, &mut surface);
        assert_eq!(
            surface.0,
            ["render 4 2 Parent", "highlight Parent 2-2", "note Parent 2 drop y?"]
        );
    }
}
