// Watermarkize Library
// Capture or pick a photo, stamp it, preview it and save it to device storage.

pub mod acquisition;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod notify;
pub mod permissions;
pub mod persistence;
pub mod session;
pub mod watermark;
