//! Annotation session controller.
//!
//! The session is an explicit state machine. The design separates:
//! - **State**: what the session knows (`SessionState`, `Phase`)
//! - **Events**: what happened (`Event`)
//! - **Effects**: what to do next (`Effect`)
//! - **Transition**: pure function `(State, Event) -> (State, Vec<Effect>)`
//!
//! The host executes effects (HTTP calls, the lock timer) and feeds their
//! outcomes back in as events. Nothing in this module performs I/O, so the
//! whole acquire → read → label → advance cycle is testable without a
//! terminal or a backend.

pub mod effect;
pub mod event;
pub mod state;
pub mod transition;

pub use effect::*;
pub use event::*;
pub use state::*;
pub use transition::*;

/// Owns the current [`SessionState`] and applies events to it.
///
/// The rendering layer only reads [`Session::state`]; all mutation goes
/// through [`Session::dispatch`].
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            state: SessionState::new(config),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies `event` and returns the effects the host must run, in order.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let TransitionResult { state, effects } = transition(state, event);
        self.state = state;
        effects
    }
}
