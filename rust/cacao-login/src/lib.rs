//! Sign-In with Ethereum, producing a signed and archived CACAO.
//!
//! # Overview
//!
//! [`Login::sign_in`] runs every stage in sequence, each one consuming the
//! complete output of the previous:
//!
//! 1. Build the unsigned CACAO from [`LoginSettings`] and a [`LoginRequest`]
//! 2. Render the canonical message and hand it to a [`MessageSigner`]
//! 3. Attach the returned signature
//! 4. Encode the signed object as a DAG-CBOR block and derive its CID
//! 5. Round-trip the block through a [`BlockStore`] to verify it
//! 6. Write the block into a CAR archive and encode it as base64url text
//!
//! If the signer rejects or the store round-trip fails, nothing is
//! returned and no archive is produced.

#![warn(missing_docs)]

mod error;
pub use error::*;

mod login;
pub use login::*;

mod settings;
pub use settings::*;

mod signer;
pub use signer::*;

mod store;
pub use store::*;
