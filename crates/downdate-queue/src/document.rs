use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

/// One hardlink-style replacement operation: the destination is replaced
/// by the file at the source path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardlinkOperation {
    pub source: String,
    pub destination: String,
}

/// Pending-operation queue document.
///
/// The consuming mechanism expects the post-restart operation list first;
/// every crafted operation lands there, and the trailing second-phase list
/// stays empty.
#[derive(Debug, Clone, Default)]
pub struct PendingXml {
    post_restart: Vec<HardlinkOperation>,
}

impl PendingXml {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_hardlink(&mut self, operation: HardlinkOperation) {
        self.post_restart.push(operation);
    }

    pub fn operations(&self) -> &[HardlinkOperation] {
        &self.post_restart
    }

    pub fn is_empty(&self) -> bool {
        self.post_restart.is_empty()
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut transaction = BytesStart::new("PendingTransaction");
        transaction.push_attribute(("Version", "3.1"));
        writer.write_event(Event::Start(transaction))?;

        let mut post_restart = BytesStart::new("POQ");
        post_restart.push_attribute(("postAction", "reboot"));
        writer.write_event(Event::Start(post_restart))?;
        for operation in &self.post_restart {
            let mut element = BytesStart::new("HardlinkFile");
            element.push_attribute(("source", operation.source.as_str()));
            element.push_attribute(("destination", operation.destination.as_str()));
            writer.write_event(Event::Empty(element))?;
        }
        writer.write_event(Event::End(BytesEnd::new("POQ")))?;

        // Second execution phase, unused by the crafting engine.
        writer.write_event(Event::Empty(BytesStart::new("POQ")))?;

        writer.write_event(Event::End(BytesEnd::new("PendingTransaction")))?;

        String::from_utf8(writer.into_inner()).context("queue document is not valid UTF-8")
    }

    /// Persists the serialized document.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let document = self.to_xml_string()?;
        fs::write(path, document)
            .with_context(|| format!("failed writing queue document: {}", path.display()))
    }
}
