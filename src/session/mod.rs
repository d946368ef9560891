//! Session: the single-screen capture -> mark -> preview/save flow.
//!
//! [`state`] holds the pure reducer and view models, [`store`] makes the
//! state observable, [`controller`] drives the collaborators and
//! [`cancel`] lets callers abandon an in-flight action.

pub mod cancel;
pub mod controller;
pub mod state;
pub mod store;

pub use cancel::CancelToken;
pub use controller::{ActionOutcome, Collaborators, Rejection, SessionController};
pub use state::{is_png_data_uri, reduce, Action, Controls, PendingAction, Phase, SessionState, ViewerModel};
pub use store::SessionStore;
