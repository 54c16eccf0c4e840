//! The signing key directory.

use std::{fs, path::Path};

use log::debug;

use crate::Error;

/// A named signing key: the key's file name and its contents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SigningKey {
    /// The file name of the key.
    pub name: String,
    /// The raw contents of the key file.
    pub data: Vec<u8>,
}

/// Reads every regular file in `directory` as a named signing key.
///
/// Entries that are not regular files are skipped. Keys are returned sorted
/// by name, so the result is deterministic regardless of directory
/// iteration order.
///
/// # Errors
///
/// Returns an error if `directory` is not a directory or an entry cannot be
/// read.
pub fn read_keys(directory: impl AsRef<Path>) -> Result<Vec<SigningKey>, Error> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(Error::NotADirectory {
            path: directory.to_path_buf(),
        });
    }

    let entries = fs::read_dir(directory).map_err(|source| Error::IoPath {
        path: directory.to_path_buf(),
        context: "reading the key directory",
        source,
    })?;

    let mut keys = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::IoPath {
            path: directory.to_path_buf(),
            context: "reading a key directory entry",
            source,
        })?;
        let file_type = entry.file_type().map_err(|source| Error::IoPath {
            path: entry.path(),
            context: "reading the file type of a key",
            source,
        })?;
        if !file_type.is_file() {
            continue;
        }

        let data = fs::read(entry.path()).map_err(|source| Error::IoPath {
            path: entry.path(),
            context: "reading a key file",
            source,
        })?;
        keys.push(SigningKey {
            name: entry.file_name().to_string_lossy().into_owned(),
            data,
        });
    }

    keys.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Read {} signing keys from {directory:?}.", keys.len());
    Ok(keys)
}
