//! Image acquisition.
//!
//! Camera capture and library picking share one contract: the provider gets
//! [`PickerOptions`] and answers with a [`PickerResult`] holding zero or more
//! assets. Only the first asset is ever used.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which picker entry point to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionSource {
    /// Live capture from the camera.
    Capture,
    /// Selection from the photo library.
    Pick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    Photo,
    Video,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraType {
    #[default]
    Back,
    Front,
}

/// Options shared by capture and pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PickerOptions {
    pub media_type: MediaType,
    pub camera_type: CameraType,
}

/// A captured or selected photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredAsset {
    /// Resource locator, e.g. `file:///.../IMG_0001.jpg`
    pub uri: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl AcquiredAsset {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width).filter(|w| *w > 0);
        self.height = Some(height).filter(|h| *h > 0);
        self
    }
}

/// What the picker handed back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerResult {
    pub did_cancel: bool,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub assets: Option<Vec<AcquiredAsset>>,
}

impl PickerResult {
    pub fn cancelled() -> Self {
        Self {
            did_cancel: true,
            ..Self::default()
        }
    }

    pub fn with_asset(asset: AcquiredAsset) -> Self {
        Self {
            assets: Some(vec![asset]),
            ..Self::default()
        }
    }

    /// Reduce the raw result to the first asset.
    ///
    /// A reported error code becomes an error; no assets (cancelled or an
    /// empty list) becomes `None`.
    pub fn into_first_asset(self) -> Result<Option<AcquiredAsset>, AcquisitionError> {
        if let Some(code) = self.error_code {
            return Err(AcquisitionError::Picker {
                code,
                message: self.error_message.unwrap_or_default(),
            });
        }

        Ok(self.assets.and_then(|assets| assets.into_iter().next()))
    }
}

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Picker reported {code}: {message}")]
    Picker { code: String, message: String },

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Failed to read image metadata: {0}")]
    Metadata(String),
}

/// Camera and library picker.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    async fn launch_camera(&self, options: PickerOptions) -> Result<PickerResult, AcquisitionError>;

    async fn launch_image_library(
        &self,
        options: PickerOptions,
    ) -> Result<PickerResult, AcquisitionError>;
}

/// Dispatch to the right picker entry point.
pub async fn acquire(
    provider: &dyn ImageProvider,
    source: AcquisitionSource,
    options: PickerOptions,
) -> Result<Option<AcquiredAsset>, AcquisitionError> {
    let result = match source {
        AcquisitionSource::Capture => provider.launch_camera(options).await?,
        AcquisitionSource::Pick => provider.launch_image_library(options).await?,
    };

    if result.did_cancel {
        tracing::debug!(?source, "Picker cancelled by user");
    }

    result.into_first_asset()
}

/// Turn a local path into a `file://` URI.
pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Headless provider backed by files on disk.
///
/// The camera "captures" `capture_input` and the library "picks"
/// `library_input`; a missing input behaves like the user cancelling.
#[derive(Debug, Clone, Default)]
pub struct FileImageProvider {
    capture_input: Option<PathBuf>,
    library_input: Option<PathBuf>,
}

impl FileImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capture_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.capture_input = Some(path.into());
        self
    }

    pub fn with_library_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_input = Some(path.into());
        self
    }

    async fn describe(path: &Path) -> Result<PickerResult, AcquisitionError> {
        let owned = path.to_path_buf();
        let (width, height) = tokio::task::spawn_blocking(move || image::image_dimensions(&owned))
            .await
            .map_err(|e| AcquisitionError::Metadata(e.to_string()))?
            .map_err(|e| AcquisitionError::Metadata(format!("{}: {}", path.display(), e)))?;

        let absolute = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| AcquisitionError::Metadata(format!("{}: {}", path.display(), e)))?;

        Ok(PickerResult::with_asset(
            AcquiredAsset::new(file_uri(&absolute)).with_dimensions(width, height),
        ))
    }
}

#[async_trait]
impl ImageProvider for FileImageProvider {
    async fn launch_camera(&self, options: PickerOptions) -> Result<PickerResult, AcquisitionError> {
        if options.media_type != MediaType::Photo {
            return Err(AcquisitionError::DeviceUnavailable(
                "only photo capture is supported".to_string(),
            ));
        }
        match &self.capture_input {
            Some(path) => Self::describe(path).await,
            None => Ok(PickerResult::cancelled()),
        }
    }

    async fn launch_image_library(
        &self,
        _options: PickerOptions,
    ) -> Result<PickerResult, AcquisitionError> {
        match &self.library_input {
            Some(path) => Self::describe(path).await,
            None => Ok(PickerResult::cancelled()),
        }
    }
}
