use serde::{Deserialize, Serialize};

use crate::LoginError;

/// Audience used when none is configured.
pub const DEFAULT_AUDIENCE: &str = "http://localhost:3000";

/// Login URI used when none is configured.
pub const DEFAULT_URI: &str = "http://localhost:3000/login";

/// Statement used when none is configured.
pub const DEFAULT_STATEMENT: &str =
    "I accept the ServiceOrg Terms of Service: https://service.org/tos";

/// Resources used when none are configured.
pub const DEFAULT_RESOURCES: [&str; 2] = [
    "ipfs://bafybeiemxf5abjwjbikoz4mc3a3dla6ual3jsgpdr4cjr3oz3evfyavhwq",
    "https://example.com/my-web2-claim.json",
];

/// What the relying party asks every signer to agree to.
///
/// Missing keys in a settings document fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginSettings {
    /// URI of the relying party.
    pub audience: String,
    /// Login endpoint.
    pub uri: String,
    /// Human-readable disclosure.
    pub statement: String,
    /// Resources, in the order they are signed.
    pub resources: Vec<String>,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            audience: DEFAULT_AUDIENCE.to_string(),
            uri: DEFAULT_URI.to_string(),
            statement: DEFAULT_STATEMENT.to_string(),
            resources: DEFAULT_RESOURCES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl LoginSettings {
    /// Parse settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::Settings`] if the document is not valid JSON or
    /// has a field of the wrong type.
    pub fn from_json(document: &str) -> Result<Self, LoginError> {
        serde_json::from_str(document).map_err(|error| LoginError::Settings(error.to_string()))
    }
}
