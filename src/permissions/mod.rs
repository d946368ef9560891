//! Permission gate.
//!
//! Asks the platform broker for camera access and, on OS versions without
//! scoped storage, for the legacy storage write permission. The answers are
//! collected once at startup into a [`PermissionState`] and never refreshed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DeviceConfig, PermissionAnswers};
use crate::constants::SCOPED_STORAGE_MIN_OS_VERSION;

/// Platform permissions the app asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Camera,
    WriteExternalStorage,
}

/// Answer from the permission broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Unavailable,
    Blocked,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

#[derive(Error, Debug)]
pub enum PermissionError {
    #[error("Permission request for {permission:?} failed: {message}")]
    RequestFailed {
        permission: Permission,
        message: String,
    },
}

/// Platform permission broker.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionBroker: Send + Sync {
    /// Request a permission, prompting the user if the platform needs to.
    async fn request(&self, permission: Permission) -> Result<PermissionStatus, PermissionError>;
}

/// Device and OS information.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceInfo: Send + Sync {
    /// OS version as reported by the platform, e.g. "13" or "12.1".
    fn system_version(&self) -> String;
}

/// Which gated features are available this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionState {
    pub camera_granted: bool,
    pub storage_granted: bool,
}

/// Numeric value of an OS version string.
///
/// Blank strings count as zero, anything that is not a plain number is
/// `None` and never passes a threshold.
pub fn parse_os_version(version: &str) -> Option<f64> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether the OS uses scoped storage, so writes to public directories need
/// no broad permission.
pub fn has_scoped_storage(version: &str) -> bool {
    parse_os_version(version).is_some_and(|v| v >= SCOPED_STORAGE_MIN_OS_VERSION)
}

/// Run the startup permission sequence.
///
/// Each flag is set as soon as its step resolves. Any broker error ends the
/// sequence; it is logged and the flags keep whatever they held at that
/// point.
pub async fn fetch_permissions(
    broker: &dyn PermissionBroker,
    device: &dyn DeviceInfo,
) -> PermissionState {
    let mut state = PermissionState::default();

    if let Err(e) = run_permission_sequence(broker, device, &mut state).await {
        tracing::warn!(error = %e, "Permission sequence failed");
    }

    tracing::info!(
        camera_granted = state.camera_granted,
        storage_granted = state.storage_granted,
        "Permissions resolved"
    );

    state
}

async fn run_permission_sequence(
    broker: &dyn PermissionBroker,
    device: &dyn DeviceInfo,
    state: &mut PermissionState,
) -> Result<(), PermissionError> {
    let camera = broker.request(Permission::Camera).await?;
    if camera.is_granted() {
        state.camera_granted = true;
    } else {
        tracing::debug!(status = ?camera, "Camera permission not granted");
    }

    let os_version = device.system_version();
    if has_scoped_storage(&os_version) {
        tracing::debug!(os_version = %os_version, "Scoped storage, skipping write permission");
        state.storage_granted = true;
        return Ok(());
    }

    let storage = broker.request(Permission::WriteExternalStorage).await?;
    if storage.is_granted() {
        state.storage_granted = true;
    } else {
        tracing::debug!(status = ?storage, "Storage permission not granted");
    }

    Ok(())
}

/// Broker that answers from configuration, for headless runs.
#[derive(Debug, Clone)]
pub struct StaticPermissionBroker {
    answers: PermissionAnswers,
}

impl StaticPermissionBroker {
    pub fn new(answers: PermissionAnswers) -> Self {
        Self { answers }
    }
}

#[async_trait]
impl PermissionBroker for StaticPermissionBroker {
    async fn request(&self, permission: Permission) -> Result<PermissionStatus, PermissionError> {
        let status = match permission {
            Permission::Camera => self.answers.camera,
            Permission::WriteExternalStorage => self.answers.write_external_storage,
        };
        tracing::debug!(?permission, ?status, "Answering permission request");
        Ok(status)
    }
}

/// Device info that reports a configured OS version.
#[derive(Debug, Clone)]
pub struct StaticDeviceInfo {
    os_version: String,
}

impl StaticDeviceInfo {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            os_version: config.os_version.clone(),
        }
    }
}

impl DeviceInfo for StaticDeviceInfo {
    fn system_version(&self) -> String {
        self.os_version.clone()
    }
}
