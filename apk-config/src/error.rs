//! Error handling for apk-config.

use std::path::PathBuf;

/// The error that can occur when handling host configuration files.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred at a path.
    #[error("I/O error at path {path} while {context}:\n{source}")]
    IoPath {
        /// The path at which the error occurred.
        path: PathBuf,
        /// The context in which the error occurred.
        ///
        /// This is meant to complete the sentence "I/O error at path while ".
        context: &'static str,
        /// The source error.
        source: std::io::Error,
    },

    /// A file is missing its required trailing newline.
    #[error("The file {path} is missing its trailing newline")]
    MissingTrailingNewline {
        /// The file missing the newline.
        path: PathBuf,
    },

    /// A repository line does not match `url` or `@tag url`.
    #[error("Invalid repository line: {0}")]
    InvalidRepository(String),

    /// The architecture file does not contain exactly one line.
    #[error("The architecture file {path} must contain a single line")]
    MalformedArchitecture {
        /// The offending file.
        path: PathBuf,
    },

    /// A path is not a directory.
    #[error("The path is not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
    },
}
