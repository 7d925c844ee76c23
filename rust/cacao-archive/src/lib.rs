//! CARv1 archives of content-addressed blocks.
//!
//! An archive is a header declaring one or more root CIDs followed by the
//! blocks needed to reconstruct those roots. [`ArchiveWriter`] emits it
//! incrementally into an [`ArchiveSink`], one chunk for the header and one
//! per block, and [`Archive::read`] replays a complete byte sequence.
//!
//! ```text
//! varint(len(header)) | header | ( varint(len(cid) + len(data)) | cid | data )*
//! ```
//!
//! The header is the DAG-CBOR map `{roots: [CID], version: 1}`; varints are
//! unsigned LEB128. For text transport the bytes are encoded with
//! [`to_base64url`].

#![warn(missing_docs)]

mod error;
pub use error::*;

mod header;
pub use header::*;

mod reader;
pub use reader::*;

mod sink;
pub use sink::*;

mod text;
pub use text::*;

mod writer;
pub use writer::*;
