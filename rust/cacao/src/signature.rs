//! Signature entries and attaching a wallet signature to a [`Cacao`].

use crate::{Cacao, CacaoError};
use ipld_core::ipld::Ipld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of a CACAO's signature list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(rename = "m", default, skip_serializing_if = "Option::is_none")]
    meta: Option<BTreeMap<String, Ipld>>,

    #[serde(rename = "s", with = "serde_bytes")]
    bytes: Vec<u8>,
}

impl Signature {
    /// Wraps raw signature bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { meta: None, bytes }
    }

    /// Decodes a hex signature as returned by a wallet, with or without a
    /// leading `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::MalformedSignature`] when the remainder is
    /// empty, has odd length or contains a non-hex character.
    pub fn from_hex(signature: &str) -> Result<Self, CacaoError> {
        let digits = signature
            .strip_prefix("0x")
            .or_else(|| signature.strip_prefix("0X"))
            .unwrap_or(signature);

        if digits.is_empty() {
            return Err(CacaoError::MalformedSignature(
                "signature is empty".to_string(),
            ));
        }

        let bytes = hex::decode(digits)
            .map_err(|error| CacaoError::MalformedSignature(format!("{error}")))?;
        Ok(Self::new(bytes))
    }

    /// Attaches metadata to this entry.
    #[must_use]
    pub fn with_meta(mut self, meta: BTreeMap<String, Ipld>) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Raw signature bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Optional metadata.
    #[must_use]
    pub const fn meta(&self) -> Option<&BTreeMap<String, Ipld>> {
        self.meta.as_ref()
    }
}

impl Cacao {
    /// Decodes `signature` (see [`Signature::from_hex`]) and appends it.
    ///
    /// Nothing but the signature list changes.
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::MalformedSignature`] if the hex is malformed;
    /// the object is not modified in that case.
    pub fn attach_signature(self, signature: &str) -> Result<Self, CacaoError> {
        let signature = Signature::from_hex(signature)?;
        Ok(self.push_signature(signature))
    }

    /// Appends an already decoded signature entry.
    #[must_use]
    pub fn push_signature(mut self, signature: Signature) -> Self {
        tracing::trace!(
            issuer = %self.payload.issuer,
            length = signature.bytes.len(),
            "attaching signature"
        );
        self.signatures.push(signature);
        self
    }
}
