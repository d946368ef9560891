// Shared in-memory collaborators for session tests
//
// Each fake records what it was asked to do so tests can assert on the
// exact sequence of calls the session made.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use watermarkize::acquisition::{
    AcquiredAsset, AcquisitionError, ImageProvider, PickerOptions, PickerResult,
};
use watermarkize::notify::{Notification, Notifier};
use watermarkize::permissions::{
    DeviceInfo, Permission, PermissionBroker, PermissionError, PermissionStatus,
};
use watermarkize::persistence::{FileSystem, PersistenceError, SaveTarget};
use watermarkize::session::{Collaborators, SessionController};
use watermarkize::watermark::{MarkingEngine, WatermarkConfig, WatermarkError};

pub const PAYLOAD_A: &str = "data:image/png;base64,AAEC";
pub const PAYLOAD_B: &str = "data:image/png;base64,AwQF";

/// Broker answering from a fixed table and logging every request.
pub struct FakeBroker {
    camera: PermissionStatus,
    storage: PermissionStatus,
    pub requests: Mutex<Vec<Permission>>,
}

impl FakeBroker {
    pub fn new(camera: PermissionStatus, storage: PermissionStatus) -> Self {
        Self {
            camera,
            storage,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn granting() -> Self {
        Self::new(PermissionStatus::Granted, PermissionStatus::Granted)
    }
}

#[async_trait]
impl PermissionBroker for FakeBroker {
    async fn request(&self, permission: Permission) -> Result<PermissionStatus, PermissionError> {
        self.requests.lock().push(permission);
        Ok(match permission {
            Permission::Camera => self.camera,
            Permission::WriteExternalStorage => self.storage,
        })
    }
}

pub struct FakeDevice(pub &'static str);

impl DeviceInfo for FakeDevice {
    fn system_version(&self) -> String {
        self.0.to_string()
    }
}

/// Picker replaying scripted results in order; cancels once exhausted.
#[derive(Default)]
pub struct ScriptedPicker {
    results: Mutex<VecDeque<Result<PickerResult, AcquisitionError>>>,
    pub launches: Mutex<Vec<&'static str>>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_asset(self, asset: AcquiredAsset) -> Self {
        self.results
            .lock()
            .push_back(Ok(PickerResult::with_asset(asset)));
        self
    }

    pub fn then_cancel(self) -> Self {
        self.results.lock().push_back(Ok(PickerResult::cancelled()));
        self
    }

    pub fn then_error(self, error: AcquisitionError) -> Self {
        self.results.lock().push_back(Err(error));
        self
    }

    fn next(&self) -> Result<PickerResult, AcquisitionError> {
        self.results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(PickerResult::cancelled()))
    }
}

#[async_trait]
impl ImageProvider for ScriptedPicker {
    async fn launch_camera(&self, _options: PickerOptions) -> Result<PickerResult, AcquisitionError> {
        self.launches.lock().push("camera");
        self.next()
    }

    async fn launch_image_library(
        &self,
        _options: PickerOptions,
    ) -> Result<PickerResult, AcquisitionError> {
        self.launches.lock().push("library");
        self.next()
    }
}

/// Marking engine replaying scripted payloads and recording each request.
///
/// A `None` step never resolves.
#[derive(Default)]
pub struct ScriptedMarker {
    results: Mutex<VecDeque<Option<Result<String, WatermarkError>>>>,
    pub requests: Mutex<Vec<WatermarkConfig>>,
}

impl ScriptedMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_payload(self, payload: &str) -> Self {
        self.results.lock().push_back(Some(Ok(payload.to_string())));
        self
    }

    pub fn then_error(self, error: WatermarkError) -> Self {
        self.results.lock().push_back(Some(Err(error)));
        self
    }

    pub fn then_stall(self) -> Self {
        self.results.lock().push_back(None);
        self
    }
}

#[async_trait]
impl MarkingEngine for ScriptedMarker {
    async fn mark_text(&self, config: WatermarkConfig) -> Result<String, WatermarkError> {
        self.requests.lock().push(config);
        let next = self.results.lock().pop_front();
        match next {
            Some(Some(result)) => result,
            Some(None) => std::future::pending().await,
            None => Err(WatermarkError::RenderError("no scripted result".to_string())),
        }
    }
}

/// Filesystem keeping the latest content per path.
#[derive(Default)]
pub struct MemoryFileSystem {
    pub writes: Mutex<Vec<(PathBuf, String)>>,
    fail_with: Mutex<Option<String>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        let fs = Self::default();
        *fs.fail_with.lock() = Some(message.to_string());
        fs
    }

    pub fn content_at(&self, path: &Path) -> Option<String> {
        self.writes
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, c)| c.clone())
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn write_base64(&self, path: &Path, content: &str) -> Result<(), PersistenceError> {
        if let Some(message) = self.fail_with.lock().clone() {
            return Err(PersistenceError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, message),
            });
        }
        self.writes
            .lock()
            .push((path.to_path_buf(), content.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub shown: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn show(&self, notification: Notification) {
        self.shown.lock().push(notification);
    }
}

/// A controller plus handles on every fake it was built from.
pub struct Harness {
    pub controller: SessionController,
    pub broker: Arc<FakeBroker>,
    pub picker: Arc<ScriptedPicker>,
    pub marker: Arc<ScriptedMarker>,
    pub fs: Arc<MemoryFileSystem>,
    pub notifier: Arc<RecordingNotifier>,
}

pub struct HarnessBuilder {
    broker: FakeBroker,
    os_version: &'static str,
    picker: ScriptedPicker,
    marker: ScriptedMarker,
    fs: MemoryFileSystem,
    save_target: SaveTarget,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            broker: FakeBroker::granting(),
            os_version: "14",
            picker: ScriptedPicker::new(),
            marker: ScriptedMarker::new(),
            fs: MemoryFileSystem::new(),
            save_target: SaveTarget::with_timestamp("/storage/Download", 1_700_000_000_000),
        }
    }

    pub fn broker(mut self, broker: FakeBroker) -> Self {
        self.broker = broker;
        self
    }

    pub fn os_version(mut self, version: &'static str) -> Self {
        self.os_version = version;
        self
    }

    pub fn picker(mut self, picker: ScriptedPicker) -> Self {
        self.picker = picker;
        self
    }

    pub fn marker(mut self, marker: ScriptedMarker) -> Self {
        self.marker = marker;
        self
    }

    pub fn fs(mut self, fs: MemoryFileSystem) -> Self {
        self.fs = fs;
        self
    }

    pub fn build(self) -> Harness {
        let broker = Arc::new(self.broker);
        let picker = Arc::new(self.picker);
        let marker = Arc::new(self.marker);
        let fs = Arc::new(self.fs);
        let notifier = Arc::new(RecordingNotifier::default());

        let controller = SessionController::new(
            Collaborators {
                permission_broker: broker.clone(),
                device_info: Arc::new(FakeDevice(self.os_version)),
                image_provider: picker.clone(),
                marking_engine: marker.clone(),
                file_system: fs.clone(),
                notifier: notifier.clone(),
            },
            self.save_target,
        );

        Harness {
            controller,
            broker,
            picker,
            marker,
            fs,
            notifier,
        }
    }
}

pub fn asset(width: u32) -> AcquiredAsset {
    AcquiredAsset::new(format!("file:///photos/{}.jpg", width)).with_dimensions(width, width / 2)
}
