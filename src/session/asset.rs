use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::global;

/// The single recording file. Every successful recording overwrites it and
/// playback always reads it; nothing ever deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingAsset {
    path: PathBuf,
}

impl RecordingAsset {
    /// The asset at its fixed application-private location.
    pub fn fixed() -> Result<Self> {
        Ok(Self::at(global::recording_file()?))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}
