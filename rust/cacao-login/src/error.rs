use cacao::CacaoError;
use cacao_archive::ArchiveError;
use ipld_core::cid::Cid;
use thiserror::Error;

/// Why the external signer did not produce a signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The user declined to sign
    #[error("Signing rejected: {0}")]
    Rejected(String),

    /// The signer could not be reached or timed out
    #[error("Signer unavailable: {0}")]
    Unavailable(String),
}

/// An error reported by a [`BlockStore`][crate::BlockStore].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An error that occurs when working with a storage backend
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum LoginError {
    /// Building, signing or encoding the CACAO failed
    #[error(transparent)]
    Cacao(#[from] CacaoError),

    /// Writing the archive failed
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The signer did not return a signature
    #[error(transparent)]
    Signing(#[from] SignerError),

    /// The block store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The store returned nothing, or something else, for a block just put
    #[error("Block {0} did not round-trip through the store")]
    RoundTripMismatch(Cid),

    /// The settings document could not be parsed
    #[error("Invalid login settings: {0}")]
    Settings(String),
}
