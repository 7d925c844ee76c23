//! The CACAO data model.
//!
//! Field names on the wire follow the CACAO convention (`h`, `p`, `s` at the
//! top level and JWT-style claim names in the payload). Fields are declared
//! in DAG-CBOR canonical key order (shorter keys first, then bytewise) so
//! the encoding is canonical regardless of how the serializer treats
//! structs.

use crate::{CacaoError, Issuer, Signature, Timestamp, builder::CacaoBuilder};
use serde::{Deserialize, Serialize};

/// Header type for an EIP-4361 payload signed with an EIP-191 personal
/// message signature.
pub const HEADER_TYPE: &str = "eip4361-eip191";

/// Payload format version.
pub const VERSION: u64 = 1;

/// CACAO header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signing scheme tag.
    #[serde(rename = "t")]
    pub kind: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            kind: HEADER_TYPE.to_string(),
        }
    }
}

/// CACAO payload: the claims a wallet signs over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    /// URI of the relying party.
    #[serde(rename = "aud")]
    pub audience: String,

    /// End of the validity window.
    #[serde(rename = "exp")]
    pub expiration_time: Timestamp,

    /// When the login attempt was created.
    #[serde(rename = "iat")]
    pub issued_at: Timestamp,

    /// `did:pkh` of the signing account.
    #[serde(rename = "iss")]
    pub issuer: Issuer,

    /// Start of the validity window.
    #[serde(rename = "nbf")]
    pub not_before: Timestamp,

    /// Login endpoint.
    pub uri: String,

    /// Anti-replay nonce.
    pub nonce: u64,

    /// Network the issuer's key lives on.
    #[serde(rename = "chainId")]
    pub chain_id: u64,

    /// Always [`VERSION`].
    pub version: u64,

    /// Opaque correlation string.
    #[serde(rename = "requestId")]
    pub request_id: String,

    /// Resources the signer authorizes, in signing order.
    pub resources: Vec<String>,

    /// Human-readable disclosure.
    pub statement: String,
}

impl Payload {
    /// Checks the invariants every signed payload holds:
    ///
    /// - `nbf <= iat < exp`
    /// - `version` is [`VERSION`]
    /// - no field rendered into the message contains `\r` or `\n`, so each
    ///   field occupies exactly the line the template gives it
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::InvalidValidityWindow`],
    /// [`CacaoError::UnsupportedFormat`] or [`CacaoError::MultilineField`]
    /// for the first violation found.
    pub fn validate(&self) -> Result<(), CacaoError> {
        if !(self.not_before <= self.issued_at && self.issued_at < self.expiration_time) {
            return Err(CacaoError::InvalidValidityWindow {
                not_before: self.not_before.as_unix(),
                issued_at: self.issued_at.as_unix(),
                expiration: self.expiration_time.as_unix(),
            });
        }

        if self.version != VERSION {
            return Err(CacaoError::UnsupportedFormat {
                field: "version",
                value: self.version.to_string(),
            });
        }

        require_single_line("aud", &self.audience)?;
        require_single_line("uri", &self.uri)?;
        require_single_line("statement", &self.statement)?;
        require_single_line("requestId", &self.request_id)?;
        for resource in &self.resources {
            require_single_line("resources", resource)?;
        }
        Ok(())
    }
}

fn require_single_line(field: &'static str, value: &str) -> Result<(), CacaoError> {
    if value.contains(['\r', '\n']) {
        Err(CacaoError::MultilineField {
            field,
            value: value.to_string(),
        })
    } else {
        Ok(())
    }
}

/// A chain-agnostic capability object.
///
/// Created unsigned by [`CacaoBuilder`], then signed exactly once with
/// [`Cacao::attach_signature`]. The signature list only ever grows.
///
/// Decoding goes through the same checks as building, so a decoded `Cacao`
/// always carries the [`HEADER_TYPE`] tag and a valid payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedCacao")]
pub struct Cacao {
    #[serde(rename = "h")]
    pub(crate) header: Header,

    #[serde(rename = "p")]
    pub(crate) payload: Payload,

    #[serde(rename = "s")]
    pub(crate) signatures: Vec<Signature>,
}

/// Wire shape of a [`Cacao`] before its invariants are checked.
#[derive(Deserialize)]
struct UncheckedCacao {
    h: Header,
    p: Payload,
    s: Vec<Signature>,
}

impl TryFrom<UncheckedCacao> for Cacao {
    type Error = CacaoError;

    fn try_from(unchecked: UncheckedCacao) -> Result<Self, Self::Error> {
        let cacao = Cacao {
            header: unchecked.h,
            payload: unchecked.p,
            signatures: unchecked.s,
        };
        cacao.validate()?;
        Ok(cacao)
    }
}

impl Cacao {
    /// Creates a blank [`CacaoBuilder`].
    #[must_use]
    pub fn builder() -> CacaoBuilder {
        CacaoBuilder::new()
    }

    /// Getter for the `header` field.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Getter for the `payload` field.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Signatures in the order they were attached.
    #[must_use]
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Checks the header tag and [`Payload::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`CacaoError::UnsupportedFormat`] for a foreign header tag,
    /// otherwise whatever [`Payload::validate`] reports.
    pub fn validate(&self) -> Result<(), CacaoError> {
        if self.header.kind != HEADER_TYPE {
            return Err(CacaoError::UnsupportedFormat {
                field: "t",
                value: self.header.kind.clone(),
            });
        }
        self.payload.validate()
    }

    /// Whether at least one signature has been attached.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty()
    }
}
