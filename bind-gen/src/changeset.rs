use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use zone_text_core::{write_text, WriteError, WriteMode};

use crate::address::AddressWarning;
use crate::zone_id::ReverseZoneIdentity;

/// One file write produced by a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWrite {
    /// File name relative to the output directory.
    pub file: String,
    pub mode: WriteMode,
    pub contents: String,
    /// Operator-facing description of what the write does.
    pub summary: String,
}

/// Something the operator should know about that did not stop the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Address { warning: AddressWarning },
    ForwardZoneNotCreated { domain: String },
    ForwardZoneRewritten { domain: String },
    SelfRegistered { hostname: String, zone: String },
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address { warning } => write!(f, "{warning}"),
            Self::ForwardZoneNotCreated { domain } => write!(
                f,
                "forward zone {domain} has not been created in this session; appending anyway"
            ),
            Self::ForwardZoneRewritten { domain } => write!(
                f,
                "forward zone {domain} is already declared; rewriting its zone file only"
            ),
            Self::SelfRegistered { hostname, zone } => {
                write!(f, "nameserver {hostname} registered in {zone}")
            }
        }
    }
}

/// Session state that becomes true once a changeset's writes are on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ForwardZoneCreated,
    ReverseZoneRegistered(ReverseZoneIdentity),
}

/// The ordered writes and notices produced by one operation, plus the
/// session effects to commit after the writes succeed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Changeset {
    pub writes: Vec<FileWrite>,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    pub effects: Vec<Effect>,
}

impl Changeset {
    pub fn push_write(
        &mut self,
        file: impl Into<String>,
        mode: WriteMode,
        contents: String,
        summary: String,
    ) {
        self.writes.push(FileWrite {
            file: file.into(),
            mode,
            contents,
            summary,
        });
    }

    pub fn notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn extend(&mut self, other: Changeset) {
        self.writes.extend(other.writes);
        self.notices.extend(other.notices);
        self.effects.extend(other.effects);
    }

    /// Writes targeting `file`, in order.
    #[cfg(test)]
    pub fn writes_to<'a>(&'a self, file: &'a str) -> impl Iterator<Item = &'a FileWrite> + 'a {
        self.writes.iter().filter(move |w| w.file == file)
    }
}

/// Errors returned while applying a changeset.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("write {index} of {total} failed: {source}")]
    Write {
        index: usize,
        total: usize,
        source: WriteError,
    },
}

/// Perform every write of `changeset` under `dir`, in order.
///
/// Stops at the first failure. Writes already performed stay on disk.
pub fn apply(changeset: &Changeset, dir: &Path) -> Result<Vec<PathBuf>, ApplyError> {
    let total = changeset.writes.len();
    let mut written = Vec::with_capacity(total);
    for (index, write) in changeset.writes.iter().enumerate() {
        let path = dir.join(&write.file);
        write_text(&path, write.mode, &write.contents).map_err(|source| ApplyError::Write {
            index: index + 1,
            total,
            source,
        })?;
        tracing::debug!(path = %path.display(), mode = ?write.mode, "wrote zone text");
        written.push(path);
    }
    Ok(written)
}
