//! Chain-agnostic capability objects (CACAO) for Sign-In with Ethereum.
//!
//! This crate covers the construction side of a CACAO:
//!
//! 1. [`CacaoBuilder`] assembles the header and payload for one login attempt
//! 2. [`render_message`] turns the payload into the exact text a wallet signs
//! 3. [`Cacao::attach_signature`] merges the wallet's hex signature back in
//! 4. [`Block::encode`] produces the DAG-CBOR bytes and their CID
//!
//! # Example
//!
//! ```
//! use cacao::{Cacao, Block, render_message};
//!
//! # fn main() -> Result<(), cacao::CacaoError> {
//! let cacao = Cacao::builder()
//!     .account("0xAbCdEf0123456789aBcDeF0123456789AbCdEf01")
//!     .chain_id(4)
//!     .nonce(328917)
//!     .request_id("request-id-random")
//!     .audience("http://localhost:3000")
//!     .uri("http://localhost:3000/login")
//!     .statement("I accept the ServiceOrg Terms of Service: https://service.org/tos")
//!     .resources(["https://example.com/my-web2-claim.json"])
//!     .issued_at(1_700_000_000)
//!     .build()?;
//!
//! let message = render_message(&cacao);
//! assert!(message.starts_with("http://localhost:3000 wants you to sign in"));
//!
//! let signed = cacao.attach_signature("0xdeadbeef")?;
//! let block = Block::encode(&signed)?;
//! assert_eq!(block.decode::<Cacao>()?, signed);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod address;
pub mod block;
pub mod builder;
pub mod error;
pub mod message;
pub mod payload;
pub mod resources;
pub mod signature;
pub mod time;

pub use address::{Address, Issuer};
pub use block::{Block, DAG_CBOR, SHA2_256, cid_for};
pub use builder::{CacaoBuilder, VALIDITY_WINDOW};
pub use error::CacaoError;
pub use message::render_message;
pub use payload::{Cacao, Header, Payload, HEADER_TYPE, VERSION};
pub use resources::render_resources;
pub use signature::Signature;
pub use time::{Timestamp, to_canonical_timestamp};
