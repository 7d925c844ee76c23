use ipld_core::cid::Cid;
use serde::{Deserialize, Serialize};

/// The only archive format version this crate reads or writes.
pub const ARCHIVE_VERSION: u64 = 1;

/// The DAG-CBOR header at the start of every archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveHeader {
    /// CIDs the archive exists to transport.
    pub roots: Vec<Cid>,
    /// Always [`ARCHIVE_VERSION`].
    pub version: u64,
}

impl ArchiveHeader {
    /// A version 1 header for `roots`.
    pub fn new(roots: Vec<Cid>) -> Self {
        Self {
            roots,
            version: ARCHIVE_VERSION,
        }
    }
}
