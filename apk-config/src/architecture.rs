//! The architecture file.

use std::{fs, path::Path};

use log::debug;

use crate::Error;

/// Reads the architecture file: a single line, final newline stripped.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is empty, or contains more
/// than one line.
pub fn read_architecture(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    debug!("Reading architecture file {path:?}.");
    let contents = fs::read_to_string(path).map_err(|source| Error::IoPath {
        path: path.to_path_buf(),
        context: "reading the architecture file",
        source,
    })?;

    let architecture = contents.strip_suffix('\n').unwrap_or(&contents);
    if architecture.is_empty() || architecture.contains('\n') {
        return Err(Error::MalformedArchitecture {
            path: path.to_path_buf(),
        });
    }
    Ok(architecture.to_string())
}

/// Writes the architecture file, appending the final newline.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_architecture(path: impl AsRef<Path>, architecture: &str) -> Result<(), Error> {
    let path = path.as_ref();
    fs::write(path, format!("{architecture}\n")).map_err(|source| Error::IoPath {
        path: path.to_path_buf(),
        context: "writing the architecture file",
        source,
    })
}
