use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub fn path_exists(path: &Path) -> bool {
    path.exists()
}

pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed reading file: {}", path.display()))
}

/// Byte-for-byte content equality of two existing files.
pub fn files_byte_equal(left: &Path, right: &Path) -> Result<bool> {
    let left_len = fs::metadata(left)
        .with_context(|| format!("failed inspecting file: {}", left.display()))?
        .len();
    let right_len = fs::metadata(right)
        .with_context(|| format!("failed inspecting file: {}", right.display()))?
        .len();
    if left_len != right_len {
        return Ok(false);
    }

    Ok(read_file_bytes(left)? == read_file_bytes(right)?)
}
