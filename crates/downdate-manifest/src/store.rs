use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use downdate_core::read_file_bytes;

use crate::base::BaseManifest;
use crate::record::ManifestRecord;

const MANIFESTS_DIR: &str = "Manifests";
const MANIFEST_SUFFIX: &str = "manifest";

/// Read-only view over the versioned component archive: manifest records
/// live under `<root>/Manifests/<component>.manifest`, archived payload
/// files under `<root>/<component>/`.
#[derive(Debug, Clone)]
pub struct ComponentStore {
    root: PathBuf,
    base: Arc<BaseManifest>,
}

impl ComponentStore {
    pub fn open(root: impl Into<PathBuf>, base: BaseManifest) -> Self {
        Self {
            root: root.into(),
            base: Arc::new(base),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self, component: &str) -> PathBuf {
        self.root
            .join(MANIFESTS_DIR)
            .join(format!("{component}.{MANIFEST_SUFFIX}"))
    }

    /// Archive read interface: raw manifest bytes for one component,
    /// possibly a differential record.
    pub fn read_manifest_bytes(&self, component: &str) -> Result<Vec<u8>> {
        read_file_bytes(&self.manifest_path(component))
    }

    pub fn manifest(&self, component: &str) -> ManifestRecord {
        ManifestRecord::new(
            component.to_string(),
            self.manifest_path(component),
            Arc::clone(&self.base),
        )
    }

    /// Path of an archived payload file owned by `component`.
    pub fn component_file_path(&self, component: &str, file_name: &str) -> PathBuf {
        self.root.join(component).join(file_name)
    }

    /// Component names in the archive's enumeration order: manifest file
    /// stems in lexicographic order. Component identifiers embed their
    /// version, so enumeration order doubles as chronological order.
    pub fn component_names(&self) -> Result<Vec<String>> {
        let manifests_root = self.root.join(MANIFESTS_DIR);
        let mut names = Vec::new();

        for entry in fs::read_dir(&manifests_root).with_context(|| {
            format!(
                "failed reading manifest directory: {}",
                manifests_root.display()
            )
        })? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|value| value.to_str()) != Some(MANIFEST_SUFFIX) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|value| value.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
