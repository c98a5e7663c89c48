use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use downdate_core::{path_exists, UpdateFile};

/// Parses the declarative replacement list.
///
/// Destinations must exist on the live filesystem; there is nothing safe
/// to downgrade otherwise. A source that does not exist is resolved later
/// from the component archive.
pub fn parse_config_xml(path: &Path) -> Result<Vec<UpdateFile>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed reading config: {}", path.display()))?;
    let mut reader = Reader::from_str(&text);
    let mut update_files = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(element) | Event::Empty(element)) => {
                if element.name().local_name().as_ref() != b"UpdateFile" {
                    continue;
                }
                update_files.push(parse_update_file_element(&element, path)?);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed parsing config: {}", path.display()))
            }
        }
    }

    Ok(update_files)
}

fn parse_update_file_element(element: &BytesStart<'_>, config_path: &Path) -> Result<UpdateFile> {
    let destination = PathBuf::from(required_attribute(element, "destination", config_path)?);
    if !path_exists(&destination) {
        anyhow::bail!(
            "destination-missing: the file to update {} does not exist",
            destination.display()
        );
    }

    let source = PathBuf::from(required_attribute(element, "source", config_path)?);
    let needs_resolution = !path_exists(&source);
    Ok(UpdateFile::new(source, destination, needs_resolution))
}

fn required_attribute(element: &BytesStart<'_>, name: &str, config_path: &Path) -> Result<String> {
    let attribute = element
        .try_get_attribute(name)
        .with_context(|| format!("failed parsing config: {}", config_path.display()))?
        .with_context(|| {
            format!(
                "config {} has an UpdateFile entry without a '{name}' attribute",
                config_path.display()
            )
        })?;
    let value = attribute
        .unescape_value()
        .with_context(|| format!("failed parsing config: {}", config_path.display()))?;
    Ok(value.into_owned())
}
