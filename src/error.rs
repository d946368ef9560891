// Error types module

use thiserror::Error;

use crate::acquisition::AcquisitionError;
use crate::persistence::PersistenceError;
use crate::watermark::WatermarkError;

/// Centralized error type for the app
///
/// Every failure of the capture -> mark -> save flow ends up here before the
/// session controller turns it into silence or a notification.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (invalid YAML, missing env vars, bad values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Camera or library picker failures
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    /// Marking engine failures
    #[error(transparent)]
    Marking(#[from] WatermarkError),

    /// Writing the photo to storage failed
    #[error(transparent)]
    Save(#[from] PersistenceError),

    /// The action was cancelled through its token
    #[error("Operation cancelled")]
    Cancelled,
}

impl AppError {
    /// Whether the user gets to see this error.
    ///
    /// Only save failures surface as a notification; everything else is
    /// logged and dropped.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, AppError::Save(_))
    }
}
