//! Central application state for crlabel.
//!
//! `AppState` bundles the annotation [`Session`] with the purely visual state
//! around it: diff scroll position, the label-bar cursor, the help overlay and
//! the lock countdown. Session state only changes through
//! [`AppState::dispatch`]; rendering reads, keybindings mutate view state.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use tracing::debug;

use crlabel_core::feed::feed;
use crlabel_core::session::{Effect, Event, Session, SessionConfig};
use crlabel_core::types::Label;

use crate::diff::panel::DiffPanel;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Label guidelines and key help shown above everything else.
    HelpOverlay,
}

pub struct AppState {
    pub mode: Mode,
    pub session: Session,
    pub diff: DiffPanel,

    /// First visible row of the diff panel.
    pub diff_scroll: usize,
    /// Inner height of the diff panel, cached after each render.
    pub diff_viewport_height: u16,
    /// Centre the comment anchor on the next render (viewport height known).
    pub center_pending: bool,

    /// Index into `Label::ALL` of the keyboard-selected button.
    pub label_cursor: usize,
    /// Button areas from the last render, for mouse hit-testing.
    pub label_rects: Vec<(Label, Rect)>,

    pub help_scroll: u16,

    /// When the current reading lock is due to release.
    pub lock_deadline: Option<Instant>,
}

impl AppState {
    pub fn new(config: SessionConfig, syntax: &str) -> Self {
        Self {
            mode: Mode::default(),
            session: Session::new(config),
            diff: DiffPanel::new(syntax),
            diff_scroll: 0,
            diff_viewport_height: 0,
            center_pending: false,
            label_cursor: 0,
            label_rects: Vec::new(),
            help_scroll: 0,
            lock_deadline: None,
        }
    }

    /// Applies `event` to the session, keeps the view in step with it, and
    /// returns the effects for the driver to execute.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let effects = self.session.dispatch(event);
        for effect in &effects {
            match effect {
                Effect::CancelLock => {
                    self.lock_deadline = None;
                    self.diff.clear();
                    self.diff_scroll = 0;
                }
                Effect::ArmLock(ticket) => {
                    self.lock_deadline = Some(Instant::now() + ticket.duration);
                    self.show_current_target();
                }
                _ => {}
            }
        }
        if !self.session.state().is_locked() {
            self.lock_deadline = None;
        }
        effects
    }

    /// Time left on the reading lock, if it is still engaged.
    pub fn lock_remaining(&self, now: Instant) -> Option<Duration> {
        if !self.session.state().is_locked() {
            return None;
        }
        self.lock_deadline.map(|d| d.saturating_duration_since(now))
    }

    fn show_current_target(&mut self) {
        if let Some(target) = self.session.state().target() {
            feed(target, &mut self.diff);
            debug!(rows = self.diff.rows().len(), "diff rebuilt");
        }
        self.diff_scroll = 0;
        self.center_pending = true;
    }

    /// Scrolls so the comment anchor sits mid-viewport.
    pub fn center_on_anchor(&mut self) {
        let Some(anchor) = self.diff.anchor_row() else {
            return;
        };
        let half = usize::from(self.diff_viewport_height / 2);
        self.diff_scroll = anchor.saturating_sub(half);
        self.center_pending = false;
    }

    pub fn selected_label(&self) -> Label {
        Label::ALL[self.label_cursor.min(Label::ALL.len() - 1)]
    }

    pub fn label_cursor_left(&mut self) {
        self.label_cursor = self.label_cursor.saturating_sub(1);
    }

    pub fn label_cursor_right(&mut self) {
        self.label_cursor = (self.label_cursor + 1).min(Label::ALL.len() - 1);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.diff.rows().len().saturating_sub(1);
        self.diff_scroll = (self.diff_scroll + usize::from(lines)).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.diff_scroll = self.diff_scroll.saturating_sub(usize::from(lines));
    }

    pub fn scroll_top(&mut self) {
        self.diff_scroll = 0;
    }

    pub fn scroll_bottom(&mut self) {
        self.diff_scroll = self.diff.rows().len().saturating_sub(1);
    }

    /// Uses the viewport height cached from the previous render; scrolls by at
    /// least one row before the first frame.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.diff_viewport_height / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.diff_viewport_height / 2).max(1));
    }

    pub fn full_page_down(&mut self) {
        self.scroll_down(self.diff_viewport_height.max(1));
    }

    pub fn full_page_up(&mut self) {
        self.scroll_up(self.diff_viewport_height.max(1));
    }

    /// Jumps to the nearest run of changed lines above the viewport top.
    pub fn prev_change(&mut self) {
        if let Some(&row) = self
            .diff
            .change_offsets()
            .iter()
            .rev()
            .find(|&&row| row < self.diff_scroll)
        {
            self.diff_scroll = row;
        }
    }

    /// Jumps to the nearest run of changed lines below the viewport top.
    pub fn next_change(&mut self) {
        if let Some(&row) = self
            .diff
            .change_offsets()
            .iter()
            .find(|&&row| row > self.diff_scroll)
        {
            self.diff_scroll = row;
        }
    }
}
