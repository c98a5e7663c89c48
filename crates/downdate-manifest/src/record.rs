use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;

use downdate_core::{expand_path_variables, normalize_windows_path, read_file_bytes};

use crate::base::BaseManifest;
use crate::delta::decode_manifest_buffer;

/// A manifest file declaration missing a required attribute. The entry is
/// skipped; the rest of the manifest is still honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFileEntry {
    pub component: String,
    /// 1-based position of the declaration among the manifest's `file`
    /// elements.
    pub position: usize,
    pub missing_attribute: &'static str,
}

/// One component's manifest, read from the archive and decoded lazily.
///
/// The decoded document and the declared file list are idempotent caches:
/// repeated accessor calls never re-read, re-decode, or re-parse.
#[derive(Debug)]
pub struct ManifestRecord {
    component: String,
    manifest_path: PathBuf,
    base: Arc<BaseManifest>,
    document: Option<Vec<u8>>,
    files: Option<Vec<String>>,
    skipped: Vec<SkippedFileEntry>,
}

impl ManifestRecord {
    pub(crate) fn new(component: String, manifest_path: PathBuf, base: Arc<BaseManifest>) -> Self {
        Self {
            component,
            manifest_path,
            base,
            document: None,
            files: None,
            skipped: Vec::new(),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// Full decoded manifest document bytes.
    pub fn document(&mut self) -> Result<&[u8]> {
        if self.document.is_none() {
            let raw = read_file_bytes(&self.manifest_path)?;
            let decoded = decode_manifest_buffer(&raw, &self.base)
                .with_context(|| format!("component '{}'", self.component))?;
            self.document = Some(decoded);
        }
        Ok(self.document.as_deref().unwrap_or_default())
    }

    /// Absolute paths this component declares ownership of, in manifest
    /// order, with symbolic variables expanded and separators normalized.
    pub fn file_list(&mut self) -> Result<&[String]> {
        if self.files.is_none() {
            self.document()?;
            let document = self.document.clone().unwrap_or_default();
            let (files, skipped) = parse_file_declarations(&self.component, &document)?;
            self.files = Some(files);
            self.skipped = skipped;
        }
        Ok(self.files.as_deref().unwrap_or_default())
    }

    /// Case-insensitive membership test against the declared file list.
    pub fn contains_file(&mut self, candidate: &str) -> Result<bool> {
        let needle = normalize_windows_path(candidate);
        Ok(self
            .file_list()?
            .iter()
            .any(|declared| declared.eq_ignore_ascii_case(&needle)))
    }

    /// Declarations skipped while computing the file list.
    pub fn skipped_entries(&self) -> &[SkippedFileEntry] {
        &self.skipped
    }
}

fn parse_file_declarations(
    component: &str,
    document: &[u8],
) -> Result<(Vec<String>, Vec<SkippedFileEntry>)> {
    let text = std::str::from_utf8(document)
        .with_context(|| format!("manifest for component '{component}' is not valid UTF-8"))?;
    let mut reader = Reader::from_str(text);

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    let mut position = 0_usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                if element.name().local_name().as_ref() != b"file" {
                    continue;
                }
                position += 1;

                let directory = attribute_value(&element, "destinationPath", component)?;
                let name = attribute_value(&element, "name", component)?;
                match (directory, name) {
                    (Some(directory), Some(name)) => {
                        let expanded = expand_path_variables(&directory);
                        files.push(normalize_windows_path(&format!("{expanded}\\{name}")));
                    }
                    (None, _) => skipped.push(SkippedFileEntry {
                        component: component.to_string(),
                        position,
                        missing_attribute: "destinationPath",
                    }),
                    (_, None) => skipped.push(SkippedFileEntry {
                        component: component.to_string(),
                        position,
                        missing_attribute: "name",
                    }),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed parsing manifest for component '{component}'"))
            }
        }
    }

    Ok((files, skipped))
}

fn attribute_value(
    element: &BytesStart<'_>,
    name: &str,
    component: &str,
) -> Result<Option<String>> {
    let attribute = element.try_get_attribute(name).with_context(|| {
        format!("malformed file declaration in manifest for component '{component}'")
    })?;
    match attribute {
        Some(attribute) => {
            let value = attribute.unescape_value().with_context(|| {
                format!("malformed '{name}' attribute in manifest for component '{component}'")
            })?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}
