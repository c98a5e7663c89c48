use std::path::PathBuf;

use crate::winpath::file_name_component;

/// One declared file replacement: `destination` is downgraded to the bytes
/// at `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFile {
    /// Path whose bytes replace the destination. May point at a
    /// not-yet-existing file until resolved from the component archive.
    pub source: PathBuf,
    /// File to be replaced. Must exist on the live filesystem.
    pub destination: PathBuf,
    /// True while `source` still has to be discovered from the archive.
    pub needs_resolution: bool,
    /// Reserved for the downgrade-persistence hook.
    pub persisted: bool,
}

impl UpdateFile {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        needs_resolution: bool,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            needs_resolution,
            persisted: false,
        }
    }

    /// Fills in a source discovered from the archive.
    pub fn resolve_source(&mut self, source: impl Into<PathBuf>) {
        self.source = source.into();
        self.needs_resolution = false;
    }

    pub fn destination_file_name(&self) -> String {
        file_name_component(&self.destination.to_string_lossy()).to_string()
    }
}
