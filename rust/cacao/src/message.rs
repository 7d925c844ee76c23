//! The EIP-4361 message a wallet is asked to sign.
//!
//! The rendering is a literal substitution into a fixed template. Any change
//! to whitespace, ordering or connective text yields a different message
//! and therefore a signature no independent verifier will accept.

use crate::{Cacao, render_resources, to_canonical_timestamp};

/// Renders the exact bytes presented to the signer.
pub fn render_message(cacao: &Cacao) -> String {
    let payload = cacao.payload();
    let resources = render_resources(&payload.resources)
        .lines()
        .map(|line| format!(" {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{audience} wants you to sign in with your Ethereum account:\n\
         {address}\n\
         \n\
         {statement}\n\
         \n\
         URI: {uri}\n\
         Version: {version}\n\
         Chain ID: {chain_id}\n\
         Nonce: {nonce}\n\
         Issued At: {issued_at}\n\
         Expiration Time: {expiration_time}\n\
         Not Before: {not_before}\n\
         Request ID: {request_id}\n\
         Resources:\n\
         {resources}",
        audience = payload.audience,
        address = payload.issuer.address(),
        statement = payload.statement,
        uri = payload.uri,
        version = payload.version,
        chain_id = payload.chain_id,
        nonce = payload.nonce,
        issued_at = to_canonical_timestamp(payload.issued_at),
        expiration_time = to_canonical_timestamp(payload.expiration_time),
        not_before = to_canonical_timestamp(payload.not_before),
        request_id = payload.request_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CacaoError;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    const ACCOUNT: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

    fn build(resources: &[&str]) -> Result<Cacao, CacaoError> {
        Cacao::builder()
            .account(ACCOUNT)
            .chain_id(4)
            .nonce(328917)
            .request_id("request-id-random")
            .audience("http://localhost:3000")
            .uri("http://localhost:3000/login")
            .statement("I accept the ServiceOrg Terms of Service: https://service.org/tos")
            .resources(resources.iter().copied())
            .issued_at(1_700_000_000)
            .build()
    }

    #[test]
    fn it_renders_the_canonical_message() -> TestResult {
        let cacao = build(&[
            "ipfs://bafybeiemxf5abjwjbikoz4mc3a3dla6ual3jsgpdr4cjr3oz3evfyavhwq",
            "https://example.com/my-web2-claim.json",
        ])?;

        let expected = "http://localhost:3000 wants you to sign in with your Ethereum account:
0xAbCdEf0123456789aBcDeF0123456789AbCdEf01

I accept the ServiceOrg Terms of Service: https://service.org/tos

URI: http://localhost:3000/login
Version: 1
Chain ID: 4
Nonce: 328917
Issued At: 2023-11-14T22:13:20Z
Expiration Time: 2023-11-14T23:13:20Z
Not Before: 2023-11-14T22:13:20Z
Request ID: request-id-random
Resources:
 - ipfs://bafybeiemxf5abjwjbikoz4mc3a3dla6ual3jsgpdr4cjr3oz3evfyavhwq
 - https://example.com/my-web2-claim.json";

        assert_eq!(render_message(&cacao), expected);
        Ok(())
    }

    #[test]
    fn it_uses_the_bare_address_not_the_did() -> TestResult {
        let message = render_message(&build(&[])?);
        let second_line = message.lines().nth(1);

        assert_eq!(second_line, Some(ACCOUNT));
        assert!(!message.contains("did:pkh"));
        Ok(())
    }

    #[test]
    fn it_keeps_the_resources_header_when_empty() -> TestResult {
        let message = render_message(&build(&[])?);
        assert!(message.ends_with("Request ID: request-id-random\nResources:\n"));
        Ok(())
    }

    #[test]
    fn it_ignores_signatures() -> TestResult {
        let unsigned = build(&["https://example.com/a"])?;
        let message = render_message(&unsigned);
        let signed = unsigned.attach_signature("0xdeadbeef")?;

        assert_eq!(render_message(&signed), message);
        Ok(())
    }

    #[test]
    fn it_follows_resource_order() -> TestResult {
        let forward = render_message(&build(&["https://a.example/", "https://b.example/"])?);
        let reverse = render_message(&build(&["https://b.example/", "https://a.example/"])?);

        assert_ne!(forward, reverse);
        Ok(())
    }
}
