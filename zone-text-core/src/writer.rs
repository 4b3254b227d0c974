use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// How a file write treats existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Create the file, truncating any existing content.
    Create,
    /// Append to the file, creating it if absent.
    Append,
}

/// Errors that can occur while writing generated text.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Write `text` to `path` according to `mode`.
///
/// Every call is a single independent write; nothing ties two calls
/// together, so a failure between them leaves the earlier one on disk.
pub fn write_text(path: &Path, mode: WriteMode, text: &str) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.display().to_string(),
        source,
    };

    match mode {
        WriteMode::Create => fs::write(path, text).map_err(io_err),
        WriteMode::Append => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(io_err)?;
            file.write_all(text.as_bytes()).map_err(io_err)
        }
    }
}
