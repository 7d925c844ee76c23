//! Ethereum account addresses and the `did:pkh` issuer derived from them.

use crate::CacaoError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Prefix for issuers in the `eth` chain namespace.
pub const ISSUER_PREFIX: &str = "did:pkh:eth:";

const ADDRESS_HEX_LEN: usize = 40;

/// A `0x`-prefixed, 20 byte account address.
///
/// The original casing is preserved so that the address rendered into the
/// signed message matches what the wallet reported. Equality is therefore
/// case sensitive. Mixed casing is passed through unchecked; no EIP-55
/// checksum is verified.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(String);

impl Address {
    /// The address as given, including the `0x` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = CacaoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(digits) = s.strip_prefix("0x") else {
            return Err(CacaoError::InvalidAddress(format!(
                "expected 0x prefix, got: {s}"
            )));
        };
        if digits.len() != ADDRESS_HEX_LEN {
            return Err(CacaoError::InvalidAddress(format!(
                "expected {ADDRESS_HEX_LEN} hex digits, got {} in: {s}",
                digits.len()
            )));
        }
        if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(CacaoError::InvalidAddress(format!(
                "non-hex character in: {s}"
            )));
        }
        Ok(Address(s.to_string()))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The issuer claim of a CACAO: `did:pkh:eth:<address>`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Issuer(Address);

impl Issuer {
    /// The account this issuer was derived from.
    #[must_use]
    pub const fn address(&self) -> &Address {
        &self.0
    }
}

impl From<Address> for Issuer {
    fn from(address: Address) -> Self {
        Issuer(address)
    }
}

impl FromStr for Issuer {
    type Err = CacaoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = s.strip_prefix(ISSUER_PREFIX).ok_or_else(|| {
            CacaoError::InvalidAddress(format!("expected {ISSUER_PREFIX} prefix, got: {s}"))
        })?;
        Ok(Issuer(address.parse()?))
    }
}

impl fmt::Debug for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ISSUER_PREFIX}{}", self.0)
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ISSUER_PREFIX}{}", self.0)
    }
}

impl Serialize for Issuer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Issuer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
