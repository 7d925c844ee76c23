use cacao::{Block, Cacao, render_message};
use cacao_archive::encode_archive;
use tracing::{Instrument, debug, info_span, instrument};

use crate::{BlockStore, LoginError, LoginSettings, MessageSigner};

/// The per-attempt inputs of a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account reported by the wallet.
    pub account: String,
    /// Network the account lives on.
    pub chain_id: u64,
    /// Anti-replay nonce.
    pub nonce: u64,
    /// Opaque correlation string.
    pub request_id: String,
    /// Seconds since the epoch; the current time when `None`.
    pub issued_at: Option<i64>,
}

impl LoginRequest {
    /// A request with a fresh random nonce and request ID, issued now.
    pub fn new(account: impl Into<String>, chain_id: u64) -> Self {
        Self {
            account: account.into(),
            chain_id,
            nonce: rand::random(),
            request_id: format!("{:016x}", rand::random::<u64>()),
            issued_at: None,
        }
    }

    /// Use `nonce` instead of a random one.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Use `request_id` instead of a random one.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Pin the issue time instead of reading the clock.
    pub fn issued_at(mut self, seconds: i64) -> Self {
        self.issued_at = Some(seconds);
        self
    }
}

/// Everything a successful login produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedLogin {
    /// The signed capability object.
    pub cacao: Cacao,
    /// Its DAG-CBOR encoding and CID.
    pub block: Block,
    /// A CAR archive rooted at the block's CID, as base64url text.
    pub archive: String,
}

/// Runs the login pipeline against a signer and a block store.
pub struct Login<Signer, Store> {
    settings: LoginSettings,
    signer: Signer,
    store: Store,
}

impl<Signer, Store> Login<Signer, Store>
where
    Signer: MessageSigner,
    Store: BlockStore,
{
    /// Create a login flow.
    pub fn new(settings: LoginSettings, signer: Signer, store: Store) -> Self {
        Self {
            settings,
            signer,
            store,
        }
    }

    /// The settings every request is built with.
    pub fn settings(&self) -> &LoginSettings {
        &self.settings
    }

    /// The block store used for round-trip verification.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Build the unsigned CACAO for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::Cacao`] if the account, a URI or the issue time
    /// is invalid.
    pub fn prepare(&self, request: &LoginRequest) -> Result<Cacao, LoginError> {
        let builder = Cacao::builder()
            .account(request.account.as_str())
            .chain_id(request.chain_id)
            .nonce(request.nonce)
            .request_id(request.request_id.as_str())
            .audience(self.settings.audience.as_str())
            .uri(self.settings.uri.as_str())
            .statement(self.settings.statement.as_str())
            .resources(self.settings.resources.iter().map(String::as_str));

        let builder = match request.issued_at {
            Some(seconds) => builder.issued_at(seconds),
            None => builder,
        };

        Ok(builder.build()?)
    }

    /// Run the full pipeline for one login attempt.
    ///
    /// # Errors
    ///
    /// Any stage failure aborts the attempt; see [`LoginError`]. A rejected
    /// signature surfaces as [`LoginError::Signing`] before anything is put
    /// into the store.
    #[instrument(
        skip(self, request),
        fields(account = %request.account, request_id = %request.request_id)
    )]
    pub async fn sign_in(&mut self, request: LoginRequest) -> Result<SignedLogin, LoginError> {
        let unsigned = self.prepare(&request)?;
        let message = render_message(&unsigned);

        let signature = self
            .signer
            .sign_message(&message, unsigned.payload().issuer.address())
            .instrument(info_span!("sign_message"))
            .await?;
        debug!("signature received");

        let cacao = unsigned.attach_signature(&signature)?;
        let block = Block::encode(&cacao)?;

        self.verify_round_trip(&cacao, &block).await?;

        let archive = encode_archive(&block, [])?;
        debug!(cid = %block.cid(), length = archive.len(), "login archived");

        Ok(SignedLogin {
            cacao,
            block,
            archive,
        })
    }

    async fn verify_round_trip(&mut self, cacao: &Cacao, block: &Block) -> Result<(), LoginError> {
        let cid = *block.cid();
        self.store.put(&cid, block.bytes().to_vec()).await?;

        let Some(bytes) = self.store.get(&cid).await? else {
            return Err(LoginError::RoundTripMismatch(cid));
        };
        let fetched: Cacao = Block::from_parts(cid, bytes)?.decode()?;

        if &fetched == cacao {
            debug!(%cid, "store round trip verified");
            Ok(())
        } else {
            Err(LoginError::RoundTripMismatch(cid))
        }
    }
}
