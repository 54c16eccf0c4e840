//! Error handling for apk-types.

/// The error that can occur when handling APK types.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A string is not a valid APK package version.
    #[error("Invalid package version: {0}")]
    InvalidVersion(String),
}
