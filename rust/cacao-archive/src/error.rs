use cacao::CacaoError;
use ipld_core::cid::Cid;
use thiserror::Error;

use crate::ArchiveState;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// An operation was invoked in a state that does not permit it
    #[error("Cannot {operation} an archive that is {state}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// The writer's state at the time
        state: ArchiveState,
    },

    /// An archive must declare at least one root
    #[error("An archive needs at least one root")]
    NoRoots,

    /// A declared root has no block in the archive
    #[error("Root {0} is not among the archive's blocks")]
    MissingRoot(Cid),

    /// The header could not be encoded
    #[error("Failed to encode the archive header: {0}")]
    Encoding(String),

    /// The bytes are not a well-formed archive
    #[error("Malformed archive: {0}")]
    Malformed(String),

    /// A block's bytes do not match its CID
    #[error(transparent)]
    Block(#[from] CacaoError),

    /// The underlying writer failed
    #[error("Archive I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The receiving end of a chunk stream went away
    #[error("The archive stream receiver was dropped")]
    SinkClosed,
}
