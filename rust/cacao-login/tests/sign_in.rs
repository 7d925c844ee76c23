use cacao::{Address, Block, Cacao, render_message};
use cacao_archive::{Archive, from_base64url};
use cacao_login::{
    BlockStore, Login, LoginError, LoginRequest, LoginSettings, MemoryBlockStore, MessageSigner,
    SignerError,
};
use pretty_assertions::assert_eq;
use testresult::TestResult;

const ACCOUNT: &str = "0x6E0d01A76C3Cf4288372a29124A26D4353EE51BE";

const SIGNATURE: &str = "0x2f3a8e1b9c0d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7\
    0e1f2a3b4c5d6e7f8091a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d5e6f71b";

struct Wallet;

impl MessageSigner for Wallet {
    async fn sign_message(&self, message: &str, account: &Address) -> Result<String, SignerError> {
        if message.starts_with("http://localhost:3000 wants you to sign in")
            && account.as_str() == ACCOUNT
        {
            Ok(SIGNATURE.to_string())
        } else {
            Err(SignerError::Rejected(format!("unexpected message for {account}")))
        }
    }
}

struct Declined;

impl MessageSigner for Declined {
    async fn sign_message(&self, _: &str, _: &Address) -> Result<String, SignerError> {
        Err(SignerError::Rejected("user closed the prompt".into()))
    }
}

fn request() -> LoginRequest {
    LoginRequest::new(ACCOUNT, 1)
        .with_nonce(328917)
        .with_request_id("login-0001")
        .issued_at(1_700_000_000)
}

#[tokio::test]
async fn it_renders_the_message_the_wallet_signs() -> TestResult {
    let login = Login::new(LoginSettings::default(), Wallet, MemoryBlockStore::new());
    let cacao = login.prepare(&request())?;

    assert_eq!(
        render_message(&cacao),
        "http://localhost:3000 wants you to sign in with your Ethereum account:
0x6E0d01A76C3Cf4288372a29124A26D4353EE51BE

I accept the ServiceOrg Terms of Service: https://service.org/tos

URI: http://localhost:3000/login
Version: 1
Chain ID: 1
Nonce: 328917
Issued At: 2023-11-14T22:13:20Z
Expiration Time: 2023-11-14T23:13:20Z
Not Before: 2023-11-14T22:13:20Z
Request ID: login-0001
Resources:
 - ipfs://bafybeiemxf5abjwjbikoz4mc3a3dla6ual3jsgpdr4cjr3oz3evfyavhwq
 - https://example.com/my-web2-claim.json"
    );
    Ok(())
}

#[tokio::test]
async fn it_produces_a_replayable_archive() -> TestResult {
    let store = MemoryBlockStore::new();
    let mut login = Login::new(LoginSettings::default(), Wallet, store.clone());

    let signed = login.sign_in(request()).await?;

    let archive = Archive::read(&from_base64url(&signed.archive)?)?;
    assert_eq!(archive.roots(), &[*signed.block.cid()]);
    assert_eq!(archive.blocks().len(), 1);

    let root = archive.get(signed.block.cid()).ok_or("root block missing")?;
    let replayed: Cacao = root.decode()?;
    assert_eq!(replayed, signed.cacao);
    assert_eq!(replayed.signatures().len(), 1);
    assert_eq!(replayed.payload().issuer.to_string(), format!("did:pkh:eth:{ACCOUNT}"));

    let stored = store.get(signed.block.cid()).await?.ok_or("block not stored")?;
    assert_eq!(Block::from_parts(*signed.block.cid(), stored)?, signed.block);
    Ok(())
}

#[tokio::test]
async fn it_is_deterministic_for_identical_requests() -> TestResult {
    let mut first = Login::new(LoginSettings::default(), Wallet, MemoryBlockStore::new());
    let mut second = Login::new(LoginSettings::default(), Wallet, MemoryBlockStore::new());

    let a = first.sign_in(request()).await?;
    let b = second.sign_in(request()).await?;

    assert_eq!(a.block.cid(), b.block.cid());
    assert_eq!(a.archive, b.archive);
    Ok(())
}

#[tokio::test]
async fn it_leaves_nothing_behind_when_declined() -> TestResult {
    let store = MemoryBlockStore::new();
    let mut login = Login::new(LoginSettings::default(), Declined, store.clone());

    let result = login.sign_in(request()).await;

    assert!(matches!(result, Err(LoginError::Signing(SignerError::Rejected(_)))));
    assert!(store.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn it_applies_custom_settings() -> TestResult {
    let settings = LoginSettings::from_json(
        r#"{
            "audience": "https://service.org",
            "uri": "https://service.org/login",
            "statement": "Sign in to ServiceOrg",
            "resources": []
        }"#,
    )?;
    let store = MemoryBlockStore::new();
    let mut login = Login::new(settings, Declined, store);
    let cacao = login.prepare(&request())?;

    let message = render_message(&cacao);
    assert!(message.starts_with("https://service.org wants you to sign in"));
    assert!(message.ends_with("Request ID: login-0001\nResources:\n"));
    assert!(login.sign_in(request()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn it_refuses_settings_that_would_forge_message_lines() -> TestResult {
    let settings = LoginSettings {
        resources: vec!["https://a.example/\n- https://evil.example/".into()],
        ..LoginSettings::default()
    };
    let store = MemoryBlockStore::new();
    let mut login = Login::new(settings, Wallet, store.clone());

    let result = login.sign_in(request()).await;

    assert!(matches!(
        result,
        Err(LoginError::Cacao(cacao::CacaoError::MultilineField { .. }))
    ));
    assert!(store.is_empty().await);
    Ok(())
}
