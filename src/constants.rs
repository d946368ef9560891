// Constants module - centralized fixed values for the watermark flow
//
// Everything the app treats as a literal lives here so the flow, the CLI and
// the tests agree on the same numbers and strings.

// =============================================================================
// Watermark defaults
// =============================================================================

/// Text stamped on every photo
pub const WATERMARK_TEXT: &str = "Created with Watermarkize";

/// Font size used when the source asset does not report a width
pub const FALLBACK_FONT_SIZE: u32 = 56;

/// Source width is divided by this to get the font size
pub const FONT_SIZE_WIDTH_DIVISOR: f64 = 40.0;

/// Watermark text color
pub const WATERMARK_TEXT_COLOR: &str = "#fff";

/// Watermark background box color
pub const WATERMARK_BACKGROUND_COLOR: &str = "#000";

/// Horizontal padding of the background box in pixels
pub const WATERMARK_PADDING_X: u32 = 15;

/// Vertical padding of the background box in pixels
pub const WATERMARK_PADDING_Y: u32 = 15;

/// Distance between the watermark and the image edges in pixels
pub const WATERMARK_MARGIN: u32 = 10;

/// Base filename used by the marker when writing to disk
pub const MARKER_FILENAME: &str = "watermarkize";

// =============================================================================
// Encoding
// =============================================================================

/// Prefix of every payload produced by the marker
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Extension of saved photos
pub const SAVED_FILE_EXTENSION: &str = "png";

// =============================================================================
// Permissions
// =============================================================================

/// OS major version from which scoped storage makes the write permission moot
pub const SCOPED_STORAGE_MIN_OS_VERSION: f64 = 13.0;

// =============================================================================
// Notifications
// =============================================================================

/// Title of the save-succeeded notification
pub const SAVE_SUCCESS_TITLE: &str = "Hurray!!";

/// Body of the save-succeeded notification
pub const SAVE_SUCCESS_MESSAGE: &str = "Photo saved to your device";

/// Title of the save-failed notification
pub const SAVE_FAILURE_TITLE: &str = "Oops!";

/// Body of the save-failed notification
pub const SAVE_FAILURE_MESSAGE: &str =
    "Unable to save photo at the moment. Please check your storage permissions and retry.";

// =============================================================================
// Configuration defaults
// =============================================================================

/// Default public downloads directory
pub const DEFAULT_DOWNLOADS_DIR: &str = "Downloads";

/// Default reported OS version
pub const DEFAULT_OS_VERSION: &str = "14";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";
