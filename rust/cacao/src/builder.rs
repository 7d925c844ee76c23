//! Builder for unsigned CACAOs.

use crate::{Address, Cacao, CacaoError, Header, Issuer, Payload, Timestamp, VERSION};
use url::Url;

/// Seconds between `iat` and `exp`.
pub const VALIDITY_WINDOW: i64 = 3600;

/// Assembles the header and payload of a [`Cacao`] for one login attempt.
///
/// Every field except `resources` and `issued_at` is required. When
/// `issued_at` is not set the current time is used. `nbf` always equals
/// `iat` and `exp` is [`VALIDITY_WINDOW`] seconds later.
#[derive(Debug, Clone, Default)]
pub struct CacaoBuilder {
    account: Option<String>,
    chain_id: Option<u64>,
    nonce: Option<u64>,
    request_id: Option<String>,
    audience: Option<String>,
    uri: Option<String>,
    statement: Option<String>,
    resources: Vec<String>,
    issued_at: Option<i64>,
}

impl CacaoBuilder {
    /// Creates a blank builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the signing account (`0x` followed by 40 hex digits).
    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// Sets the chain ID.
    #[must_use]
    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Sets the nonce.
    #[must_use]
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Sets the request ID.
    #[must_use]
    pub fn request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets the audience URI.
    #[must_use]
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Sets the login URI.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the statement.
    #[must_use]
    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.statement = Some(statement.into());
        self
    }

    /// Replaces the resource list. Order is preserved.
    #[must_use]
    pub fn resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one resource.
    #[must_use]
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// Sets `iat` (and thereby `nbf` and `exp`) in seconds since the epoch.
    #[must_use]
    pub fn issued_at(mut self, seconds: i64) -> Self {
        self.issued_at = Some(seconds);
        self
    }

    /// Builds the unsigned [`Cacao`].
    ///
    /// # Errors
    ///
    /// - [`CacaoError::MissingField`] if a required field was never set
    /// - [`CacaoError::InvalidAddress`] if the account is malformed
    /// - [`CacaoError::InvalidUri`] if the audience, URI or a resource is not
    ///   an absolute URI
    /// - [`CacaoError::InvalidTimestamp`] if `iat` or `exp` is out of range
    /// - [`CacaoError::MultilineField`] if the audience, URI, statement,
    ///   request ID or a resource contains `\r` or `\n`
    pub fn build(self) -> Result<Cacao, CacaoError> {
        let account: Address = self
            .account
            .ok_or(CacaoError::MissingField("account"))?
            .parse()?;
        let chain_id = self.chain_id.ok_or(CacaoError::MissingField("chain_id"))?;
        let nonce = self.nonce.ok_or(CacaoError::MissingField("nonce"))?;
        let request_id = self
            .request_id
            .ok_or(CacaoError::MissingField("request_id"))?;
        let audience = require_uri(self.audience.ok_or(CacaoError::MissingField("audience"))?)?;
        let uri = require_uri(self.uri.ok_or(CacaoError::MissingField("uri"))?)?;
        let statement = self.statement.ok_or(CacaoError::MissingField("statement"))?;
        let resources = self
            .resources
            .into_iter()
            .map(require_uri)
            .collect::<Result<Vec<_>, _>>()?;

        let issued_at = match self.issued_at {
            Some(seconds) => Timestamp::from_unix(seconds)?,
            None => Timestamp::now(),
        };
        let expiration_time = issued_at.checked_add(VALIDITY_WINDOW)?;

        let payload = Payload {
            audience,
            expiration_time,
            issued_at,
            issuer: Issuer::from(account),
            not_before: issued_at,
            uri,
            nonce,
            chain_id,
            version: VERSION,
            request_id,
            resources,
            statement,
        };
        payload.validate()?;

        tracing::debug!(
            issuer = %payload.issuer,
            nonce = payload.nonce,
            chain_id = payload.chain_id,
            "built capability"
        );

        Ok(Cacao {
            header: Header::default(),
            payload,
            signatures: Vec::new(),
        })
    }
}

/// Validates that `uri` is absolute while keeping its exact spelling.
fn require_uri(uri: String) -> Result<String, CacaoError> {
    match Url::parse(&uri) {
        Ok(_) => Ok(uri),
        Err(error) => Err(CacaoError::InvalidUri {
            uri,
            reason: error.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HEADER_TYPE;
    use testresult::TestResult;

    const ACCOUNT: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

    fn complete() -> CacaoBuilder {
        CacaoBuilder::new()
            .account(ACCOUNT)
            .chain_id(4)
            .nonce(328917)
            .request_id("request-id-random")
            .audience("http://localhost:3000")
            .uri("http://localhost:3000/login")
            .statement("I accept the ServiceOrg Terms of Service: https://service.org/tos")
            .resources(["ipfs://bafy", "https://example.com/my-web2-claim.json"])
            .issued_at(1_700_000_000)
    }

    #[test]
    fn it_fills_every_field() -> TestResult {
        let cacao = complete().build()?;
        let payload = cacao.payload();

        assert_eq!(cacao.header().kind, HEADER_TYPE);
        assert_eq!(payload.issuer.to_string(), format!("did:pkh:eth:{ACCOUNT}"));
        assert_eq!(payload.audience, "http://localhost:3000");
        assert_eq!(payload.uri, "http://localhost:3000/login");
        assert_eq!(payload.version, 1);
        assert_eq!(payload.chain_id, 4);
        assert_eq!(payload.nonce, 328917);
        assert_eq!(payload.request_id, "request-id-random");
        assert_eq!(
            payload.resources,
            vec!["ipfs://bafy", "https://example.com/my-web2-claim.json"]
        );
        assert!(cacao.signatures().is_empty());
        Ok(())
    }

    #[test]
    fn it_derives_a_one_hour_window() -> TestResult {
        let payload = complete().build()?.payload().clone();

        assert_eq!(payload.issued_at.as_unix(), 1_700_000_000);
        assert_eq!(payload.not_before, payload.issued_at);
        assert_eq!(payload.expiration_time.as_unix(), 1_700_003_600);
        payload.validate()?;
        Ok(())
    }

    #[test]
    fn it_defaults_issued_at_to_now() -> TestResult {
        let before = Timestamp::now();
        let mut builder = complete();
        builder.issued_at = None;
        let payload = builder.build()?.payload().clone();
        let after = Timestamp::now();

        assert!(before <= payload.issued_at && payload.issued_at <= after);
        Ok(())
    }

    #[test]
    fn it_rejects_a_malformed_account() {
        let result = complete().account("0x1234").build();
        assert!(matches!(result, Err(CacaoError::InvalidAddress(_))));
    }

    #[test]
    fn it_rejects_relative_uris() {
        let result = complete().uri("/login").build();
        assert!(matches!(result, Err(CacaoError::InvalidUri { .. })));

        let result = complete().resource("not a uri").build();
        assert!(matches!(result, Err(CacaoError::InvalidUri { uri, .. }) if uri == "not a uri"));
    }

    #[test]
    fn it_rejects_resources_that_would_render_as_several_lines() {
        let result = complete()
            .resources(["https://a.example/\n- https://evil.example/"])
            .build();

        assert!(matches!(
            result,
            Err(CacaoError::MultilineField {
                field: "resources",
                ..
            })
        ));
    }

    #[test]
    fn it_rejects_line_breaks_in_rendered_fields() {
        let cases = [
            ("requestId", complete().request_id("r\nURI: https://evil.example")),
            ("statement", complete().statement("I accept\n\nURI: https://evil.example")),
            ("aud", complete().audience("https://a.example/\r\nx")),
            ("uri", complete().uri("https://a.example/\nlogin")),
        ];

        for (field, builder) in cases {
            assert_eq!(
                builder.build().map(|_| ()).map_err(|error| match error {
                    CacaoError::MultilineField { field, .. } => field,
                    _ => "other",
                }),
                Err(field)
            );
        }
    }

    #[test]
    fn it_requires_every_field() {
        let result = CacaoBuilder::new().account(ACCOUNT).build();
        assert_eq!(result, Err(CacaoError::MissingField("chain_id")));
    }

    #[test]
    fn it_rejects_windows_past_the_supported_range() {
        let result = complete().issued_at(253_402_300_000).build();
        assert!(matches!(result, Err(CacaoError::InvalidTimestamp(_))));
    }
}
