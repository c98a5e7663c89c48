use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use downdate_core::{file_name_component, UpdateFile};
use downdate_manifest::{ComponentStore, SkippedFileEntry};

/// Outcome of resolving one destination against the archive.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Component that owns the oldest archived version of the destination.
    pub component: String,
    /// Archived payload file to take the replacement bytes from.
    pub source: PathBuf,
    /// Partial manifest declarations observed while scanning.
    pub skipped_entries: Vec<SkippedFileEntry>,
}

/// Finds the oldest archived version of `destination`.
///
/// Components are scanned in the archive's enumeration order and the first
/// one declaring ownership of the destination wins; for this archive that
/// order doubles as chronological order, so the first match is the oldest
/// available version. A destination no component owns cannot be
/// downgraded and is fatal.
pub fn resolve_oldest_source(store: &ComponentStore, destination: &Path) -> Result<Resolution> {
    let destination_text = destination.to_string_lossy();
    let file_name = file_name_component(&destination_text).to_string();
    let mut skipped_entries = Vec::new();

    for component in store.component_names()? {
        let mut record = store.manifest(&component);
        let owns_destination = record.contains_file(&destination_text)?;
        skipped_entries.extend(record.skipped_entries().iter().cloned());

        if owns_destination {
            return Ok(Resolution {
                source: store.component_file_path(&component, &file_name),
                component,
                skipped_entries,
            });
        }
    }

    Err(anyhow!(
        "source-unresolvable: no archived component owns a file at {}",
        destination.display()
    ))
}

/// Fills in the source of every update file still awaiting resolution, in
/// place. `on_resolved` fires once per resolved file. Returns the partial
/// manifest declarations observed across all scans.
pub fn resolve_update_files(
    store: &ComponentStore,
    update_files: &mut [UpdateFile],
    mut on_resolved: impl FnMut(&UpdateFile, &Resolution),
) -> Result<Vec<SkippedFileEntry>> {
    let mut skipped_entries = Vec::new();

    for update_file in update_files.iter_mut() {
        if !update_file.needs_resolution {
            continue;
        }
        let resolution = resolve_oldest_source(store, &update_file.destination)?;
        update_file.resolve_source(&resolution.source);
        skipped_entries.extend(resolution.skipped_entries.iter().cloned());
        on_resolved(update_file, &resolution);
    }

    Ok(skipped_entries)
}
