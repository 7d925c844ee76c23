use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::ArchiveError;

/// Encode archive bytes as unpadded base64url, safe to embed in URLs and
/// text fields without escaping.
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode text produced by [`to_base64url`].
///
/// # Errors
///
/// Returns [`ArchiveError::Malformed`] if the text is not unpadded base64url.
pub fn from_base64url(text: &str) -> Result<Vec<u8>, ArchiveError> {
    URL_SAFE_NO_PAD
        .decode(text)
        .map_err(|error| ArchiveError::Malformed(format!("invalid base64url: {error}")))
}
