mod base;
mod delta;
mod record;
mod store;

pub use base::BaseManifest;
pub use delta::{
    decode_manifest_buffer, encode_manifest_delta, is_delta_manifest, DELTA_MANIFEST_MARKER,
};
pub use record::{ManifestRecord, SkippedFileEntry};
pub use store::ComponentStore;
