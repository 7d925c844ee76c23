//! Content-addressed DAG-CBOR blocks.

use crate::CacaoError;
use ipld_core::cid::{Cid, multihash::Multihash};
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

/// Multicodec code for DAG-CBOR.
pub const DAG_CBOR: u64 = 0x71;

/// Multihash code for SHA2-256.
pub const SHA2_256: u64 = 0x12;

/// A pair of encoded bytes and the CID that names them.
///
/// The CID is always a CIDv1 with the DAG-CBOR codec and a SHA2-256
/// multihash of exactly the held bytes; both constructors uphold this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    cid: Cid,
    bytes: Vec<u8>,
}

impl Block {
    /// Encodes `value` as DAG-CBOR and derives its CID.
    ///
    /// Encoding is deterministic: equal values always produce identical
    /// bytes and therefore identical CIDs.
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::EncodingFailure`] if `value` holds something
    /// DAG-CBOR cannot represent, such as a non-finite float.
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, CacaoError> {
        let bytes = serde_ipld_dagcbor::to_vec(value)
            .map_err(|error| CacaoError::EncodingFailure(format!("{error}")))?;
        let cid = cid_for(&bytes)?;

        tracing::debug!(%cid, length = bytes.len(), "encoded block");

        Ok(Self { cid, bytes })
    }

    /// Reassembles a block from a CID and the bytes it claims to name.
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::CidMismatch`] when the bytes do not hash to
    /// `cid`, or [`CacaoError::DecodingFailure`] when `cid` does not use the
    /// DAG-CBOR codec and a SHA2-256 multihash.
    pub fn from_parts(cid: Cid, bytes: Vec<u8>) -> Result<Self, CacaoError> {
        if cid.codec() != DAG_CBOR || cid.hash().code() != SHA2_256 {
            return Err(CacaoError::DecodingFailure(format!(
                "unsupported CID {cid}: codec 0x{:x}, multihash 0x{:x}",
                cid.codec(),
                cid.hash().code()
            )));
        }

        let actual = cid_for(&bytes)?;
        if actual != cid {
            return Err(CacaoError::CidMismatch {
                expected: cid.to_string(),
                actual: actual.to_string(),
            });
        }

        Ok(Self { cid, bytes })
    }

    /// The CID of this block.
    #[must_use]
    pub const fn cid(&self) -> &Cid {
        &self.cid
    }

    /// The encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Splits the block into its CID and bytes.
    #[must_use]
    pub fn into_parts(self) -> (Cid, Vec<u8>) {
        (self.cid, self.bytes)
    }

    /// Decodes the bytes back into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::DecodingFailure`] if the bytes are not a
    /// DAG-CBOR encoding of `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CacaoError> {
        serde_ipld_dagcbor::from_slice(&self.bytes)
            .map_err(|error| CacaoError::DecodingFailure(format!("{error}")))
    }
}

/// Computes the CIDv1 (DAG-CBOR, SHA2-256) of already encoded bytes.
///
/// # Errors
///
/// Returns [`CacaoError::EncodingFailure`] if the digest cannot be wrapped
/// in a multihash.
pub fn cid_for(bytes: &[u8]) -> Result<Cid, CacaoError> {
    let digest = Sha256::digest(bytes);
    let hash = Multihash::<64>::wrap(SHA2_256, &digest)
        .map_err(|error| CacaoError::EncodingFailure(format!("{error}")))?;
    Ok(Cid::new_v1(DAG_CBOR, hash))
}
