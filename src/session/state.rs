//! Session state, actions and the reducer.
//!
//! The reducer is the only place state changes. Every user-triggered action
//! is guarded here, so mutual exclusion does not depend on a UI disabling
//! its buttons.

use crate::acquisition::AcquisitionSource;
use crate::constants::PNG_DATA_URI_PREFIX;
use crate::permissions::PermissionState;

/// The action that currently owns the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Acquire(AcquisitionSource),
    Save,
}

/// Everything the screen renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub permissions: PermissionState,
    /// Latest marked image, a complete PNG data URI
    pub payload: Option<String>,
    pub loading: bool,
    pub preview_visible: bool,
    /// Set from the moment an action starts (picker open) until it ends
    pub pending: Option<PendingAction>,
}

/// Coarse view of [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Previewing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    PermissionsResolved(PermissionState),
    /// Start an action; rejected unless its guard holds
    Begin(PendingAction),
    /// The picker returned an asset and marking is about to start
    AssetReceived,
    /// Marking produced a new payload
    MarkingSucceeded(String),
    /// The pending action ended, successfully or not
    Finish,
    ShowPreview,
    ClosePreview,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.payload.is_none() {
            Phase::Idle
        } else if self.preview_visible {
            Phase::Previewing
        } else {
            Phase::Ready
        }
    }

    pub fn has_payload(&self) -> bool {
        self.payload.as_deref().is_some_and(|p| !p.is_empty())
    }

    fn is_busy(&self) -> bool {
        self.loading || self.pending.is_some()
    }

    pub fn can_capture(&self) -> bool {
        self.permissions.camera_granted && !self.is_busy()
    }

    pub fn can_pick(&self) -> bool {
        !self.is_busy()
    }

    pub fn can_save(&self) -> bool {
        self.permissions.storage_granted && self.has_payload() && !self.is_busy()
    }

    pub fn can_preview(&self) -> bool {
        self.has_payload() && !self.loading
    }

    fn can_begin(&self, action: PendingAction) -> bool {
        match action {
            PendingAction::Acquire(AcquisitionSource::Capture) => self.can_capture(),
            PendingAction::Acquire(AcquisitionSource::Pick) => self.can_pick(),
            PendingAction::Save => self.can_save(),
        }
    }
}

/// Whether `payload` is a PNG data URI with a non-empty body.
pub fn is_png_data_uri(payload: &str) -> bool {
    payload
        .strip_prefix(PNG_DATA_URI_PREFIX)
        .is_some_and(|body| !body.is_empty())
}

/// Compute the next state, or `None` if a guard rejects the action.
pub fn reduce(state: &SessionState, action: &Action) -> Option<SessionState> {
    let mut next = state.clone();

    match action {
        Action::PermissionsResolved(permissions) => {
            next.permissions = *permissions;
        }
        Action::Begin(pending) => {
            if !state.can_begin(*pending) {
                return None;
            }
            next.pending = Some(*pending);
            if *pending == PendingAction::Save {
                next.loading = true;
            }
        }
        Action::AssetReceived => {
            if !matches!(state.pending, Some(PendingAction::Acquire(_))) {
                return None;
            }
            next.loading = true;
        }
        Action::MarkingSucceeded(payload) => {
            if !state.loading || !is_png_data_uri(payload) {
                return None;
            }
            next.payload = Some(payload.clone());
        }
        Action::Finish => {
            next.loading = false;
            next.pending = None;
        }
        Action::ShowPreview => {
            if !state.can_preview() {
                return None;
            }
            next.preview_visible = true;
        }
        Action::ClosePreview => {
            next.preview_visible = false;
        }
    }

    Some(next)
}

/// Which controls are shown and enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub camera_enabled: bool,
    pub gallery_enabled: bool,
    pub save_visible: bool,
    pub save_enabled: bool,
    pub image_pressable: bool,
    pub activity_indicator: bool,
    pub show_placeholder: bool,
}

impl Controls {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            camera_enabled: state.can_capture(),
            gallery_enabled: state.can_pick(),
            save_visible: state.has_payload(),
            save_enabled: state.can_save(),
            image_pressable: state.can_preview(),
            activity_indicator: state.loading,
            show_placeholder: !state.has_payload(),
        }
    }
}

/// What the full-screen viewer gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerModel {
    pub images: Vec<String>,
    pub image_index: usize,
    pub swipe_to_close: bool,
    pub visible: bool,
}

impl ViewerModel {
    /// The viewer only exists while there is a payload to show.
    pub fn from_state(state: &SessionState) -> Option<Self> {
        let payload = state.payload.as_ref().filter(|p| !p.is_empty())?;
        Some(Self {
            images: vec![payload.clone()],
            image_index: 0,
            swipe_to_close: true,
            visible: state.preview_visible,
        })
    }
}
