//! Event bus for crlabel.
//!
//! Terminal input, timer ticks, backend responses and reading-lock releases
//! are all normalised into [`AppEvent`] and sent over one tokio unbounded MPSC
//! channel. The main loop is the only consumer.
//!
//! Two independent intervals drive the loop:
//! - **Render interval** (33 ms ≈ 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms) refreshes time-derived UI such as the lock
//!   countdown.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crlabel_core::reading_lock::LockGeneration;

use crate::api::types::ApiResponse;

#[derive(Debug)]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only).
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    Tick,
    Render,
    /// A backend call finished on the API worker thread.
    Api(Box<ApiResponse>),
    /// The reading-lock timer for this generation elapsed.
    LockReleased(LockGeneration),
}

/// Holds both ends of the event channel.
///
/// `tx` is cloned into every producer (input task, API worker, lock timer);
/// `rx` belongs to the main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that turns terminal input and the two intervals into events.
///
/// Runs until the receiver is dropped. `reader.next().fuse()` keeps
/// `tokio::select!` from polling a finished stream; release and repeat key
/// events are filtered so Windows terminals do not double-fire.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let sent = tokio::select! {
                _ = tick_tick => tx.send(AppEvent::Tick),
                _ = render_tick => tx.send(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        tx.send(AppEvent::Key(key))
                    }
                    Some(Ok(Event::Resize(w, h))) => tx.send(AppEvent::Resize(w, h)),
                    Some(Ok(Event::Mouse(mouse))) => tx.send(AppEvent::Mouse(mouse)),
                    _ => Ok(()),
                },
            };
            if sent.is_err() {
                break;
            }
        }
    });
}
