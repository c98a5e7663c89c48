use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// The canonical full manifest document every differential record is
/// patched against. Loaded once at process startup and shared read-only.
#[derive(Debug, Clone)]
pub struct BaseManifest {
    bytes: Vec<u8>,
}

impl BaseManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed reading base manifest: {}", path.display()))?;
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
