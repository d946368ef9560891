//! Observable session store.

use tokio::sync::watch;

use super::state::{reduce, Action, SessionState};

/// Single owner of the [`SessionState`].
///
/// State only changes through [`SessionStore::dispatch`]; everyone else gets
/// snapshots or a watch receiver.
#[derive(Debug)]
pub struct SessionStore {
    state: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state }
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Apply an action. Returns `false` if a guard rejected it.
    pub fn dispatch(&self, action: Action) -> bool {
        let mut applied = false;
        self.state.send_if_modified(|current| match reduce(current, &action) {
            Some(next) => {
                applied = true;
                let changed = *current != next;
                *current = next;
                changed
            }
            None => false,
        });

        if !applied {
            tracing::debug!(?action, "Action rejected by guard");
        }
        applied
    }
}
