//! Session controller: the capture -> mark -> preview/save flow.
//!
//! Each user action runs start to finish against the collaborators and
//! reports an [`ActionOutcome`]. Failures stop at this boundary: acquisition
//! and marking failures are logged and dropped, save failures become an
//! error notification.

use std::path::PathBuf;
use std::sync::Arc;

use super::cancel::CancelToken;
use super::state::{Action, Controls, PendingAction, SessionState, ViewerModel};
use super::store::SessionStore;
use crate::acquisition::{self, AcquisitionSource, ImageProvider, PickerOptions};
use crate::error::AppError;
use crate::notify::{Notification, Notifier};
use crate::permissions::{self, DeviceInfo, PermissionBroker, PermissionState};
use crate::persistence::{self, FileSystem, SaveTarget};
use crate::watermark::{MarkingEngine, WatermarkConfig, WatermarkError};

/// Why an action was refused before it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Another action is in flight
    Busy,
    /// A permission the action needs was not granted
    PermissionMissing,
    /// There is no marked image yet
    NothingToShow,
}

#[derive(Debug)]
pub enum ActionOutcome {
    Completed,
    /// The picker came back without an asset
    NoSelection,
    Cancelled,
    Failed(AppError),
    Rejected(Rejection),
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ActionOutcome::Completed)
    }
}

/// External capabilities the flow depends on.
#[derive(Clone)]
pub struct Collaborators {
    pub permission_broker: Arc<dyn PermissionBroker>,
    pub device_info: Arc<dyn DeviceInfo>,
    pub image_provider: Arc<dyn ImageProvider>,
    pub marking_engine: Arc<dyn MarkingEngine>,
    pub file_system: Arc<dyn FileSystem>,
    pub notifier: Arc<dyn Notifier>,
}

/// Clears `loading` and the pending action on every exit path, including
/// the action's future being dropped.
struct FinishGuard<'a> {
    store: &'a SessionStore,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::Finish);
    }
}

pub struct SessionController {
    store: SessionStore,
    collaborators: Collaborators,
    save_target: SaveTarget,
    picker_options: PickerOptions,
}

impl SessionController {
    /// Create a controller that saves to `save_target` for its whole life.
    pub fn new(collaborators: Collaborators, save_target: SaveTarget) -> Self {
        tracing::debug!(save_path = %save_target.path().display(), "Session created");
        Self {
            store: SessionStore::new(),
            collaborators,
            save_target,
            picker_options: PickerOptions::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.store.state()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    pub fn controls(&self) -> Controls {
        Controls::from_state(&self.store.state())
    }

    pub fn viewer(&self) -> Option<ViewerModel> {
        ViewerModel::from_state(&self.store.state())
    }

    pub fn save_path(&self) -> PathBuf {
        self.save_target.path().to_path_buf()
    }

    /// Resolve permissions once; call at startup.
    pub async fn start(&self) -> PermissionState {
        let permissions = permissions::fetch_permissions(
            self.collaborators.permission_broker.as_ref(),
            self.collaborators.device_info.as_ref(),
        )
        .await;
        self.store.dispatch(Action::PermissionsResolved(permissions));
        permissions
    }

    pub async fn open_camera(&self, cancel: &CancelToken) -> ActionOutcome {
        self.acquire_and_mark(AcquisitionSource::Capture, cancel)
            .await
    }

    pub async fn open_gallery(&self, cancel: &CancelToken) -> ActionOutcome {
        self.acquire_and_mark(AcquisitionSource::Pick, cancel).await
    }

    async fn acquire_and_mark(
        &self,
        source: AcquisitionSource,
        cancel: &CancelToken,
    ) -> ActionOutcome {
        if !self
            .store
            .dispatch(Action::Begin(PendingAction::Acquire(source)))
        {
            return ActionOutcome::Rejected(self.rejection_for(PendingAction::Acquire(source)));
        }
        let _finish = FinishGuard { store: &self.store };

        match cancel.run(self.acquire_and_mark_inner(source)).await {
            None => {
                tracing::info!(?source, "Acquisition cancelled");
                ActionOutcome::Cancelled
            }
            Some(Ok(true)) => ActionOutcome::Completed,
            Some(Ok(false)) => ActionOutcome::NoSelection,
            Some(Err(e)) => {
                tracing::warn!(?source, error = %e, "Acquisition or marking failed");
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Returns whether a new payload was stored.
    async fn acquire_and_mark_inner(&self, source: AcquisitionSource) -> Result<bool, AppError> {
        let asset = acquisition::acquire(
            self.collaborators.image_provider.as_ref(),
            source,
            self.picker_options,
        )
        .await?;

        let Some(asset) = asset else {
            return Ok(false);
        };

        self.store.dispatch(Action::AssetReceived);
        tracing::debug!(uri = %asset.uri, width = ?asset.width, "Marking asset");

        let payload = self
            .collaborators
            .marking_engine
            .mark_text(WatermarkConfig::for_asset(&asset))
            .await?;

        let len = payload.len();
        if !self.store.dispatch(Action::MarkingSucceeded(payload)) {
            return Err(WatermarkError::EncodeError(format!(
                "engine returned a payload that is not a PNG data URI ({} bytes)",
                len
            ))
            .into());
        }
        Ok(true)
    }

    pub async fn save_to_device(&self, cancel: &CancelToken) -> ActionOutcome {
        if !self.store.dispatch(Action::Begin(PendingAction::Save)) {
            return ActionOutcome::Rejected(self.rejection_for(PendingAction::Save));
        }
        let _finish = FinishGuard { store: &self.store };

        let Some(payload) = self.store.state().payload else {
            return ActionOutcome::Rejected(Rejection::NothingToShow);
        };

        let write = persistence::save_payload(
            self.collaborators.file_system.as_ref(),
            &self.save_target,
            &payload,
        );

        match cancel.run(write).await {
            None => {
                tracing::info!("Save cancelled");
                ActionOutcome::Cancelled
            }
            Some(Ok(_)) => {
                self.collaborators.notifier.show(Notification::save_succeeded());
                ActionOutcome::Completed
            }
            Some(Err(e)) => {
                tracing::error!(
                    path = %self.save_target.path().display(),
                    error = %e,
                    "Failed to save photo"
                );
                self.collaborators.notifier.show(Notification::save_failed());
                ActionOutcome::Failed(e.into())
            }
        }
    }

    pub fn show_preview(&self) -> ActionOutcome {
        if self.store.dispatch(Action::ShowPreview) {
            ActionOutcome::Completed
        } else if self.store.state().loading {
            ActionOutcome::Rejected(Rejection::Busy)
        } else {
            ActionOutcome::Rejected(Rejection::NothingToShow)
        }
    }

    /// The viewer asked to close.
    pub fn close_preview(&self) -> ActionOutcome {
        self.store.dispatch(Action::ClosePreview);
        ActionOutcome::Completed
    }

    fn rejection_for(&self, action: PendingAction) -> Rejection {
        let state = self.store.state();
        if state.loading || state.pending.is_some() {
            return Rejection::Busy;
        }
        match action {
            PendingAction::Acquire(AcquisitionSource::Capture) => Rejection::PermissionMissing,
            PendingAction::Acquire(AcquisitionSource::Pick) => Rejection::Busy,
            PendingAction::Save if !state.permissions.storage_granted => {
                Rejection::PermissionMissing
            }
            PendingAction::Save => Rejection::NothingToShow,
        }
    }
}
