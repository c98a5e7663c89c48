mod builder;
mod document;

pub use builder::{build_downgrade_queue, BuiltQueue};
pub use document::{HardlinkOperation, PendingXml};
