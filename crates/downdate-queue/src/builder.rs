use std::path::PathBuf;

use anyhow::Result;

use downdate_core::{files_byte_equal, UpdateFile};

use crate::document::{HardlinkOperation, PendingXml};

/// A crafted queue document plus the destinations that were skipped
/// because source and destination already hold identical bytes.
#[derive(Debug, Clone)]
pub struct BuiltQueue {
    pub document: PendingXml,
    pub skipped: Vec<PathBuf>,
}

/// Builds the replacement-operation queue from fully resolved update
/// files, preserving their order.
///
/// Entries whose source equals the destination byte-for-byte are dropped
/// entirely so the consuming mechanism never sees no-op operations.
pub fn build_downgrade_queue(update_files: &[UpdateFile]) -> Result<BuiltQueue> {
    let mut document = PendingXml::new();
    let mut skipped = Vec::new();

    for update_file in update_files {
        if update_file.needs_resolution {
            anyhow::bail!(
                "source-unresolvable: update file for {} was never resolved",
                update_file.destination.display()
            );
        }

        if files_byte_equal(&update_file.source, &update_file.destination)? {
            skipped.push(update_file.destination.clone());
            continue;
        }

        document.push_hardlink(HardlinkOperation {
            source: update_file.source.display().to_string(),
            destination: update_file.destination.display().to_string(),
        });
    }

    Ok(BuiltQueue { document, skipped })
}
