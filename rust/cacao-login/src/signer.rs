use cacao::Address;
use std::future::Future;

use crate::SignerError;

/// Produces a personal-message signature over the canonical login message.
///
/// Implementations typically forward to a wallet and suspend until the user
/// approves or rejects. The returned signature is hex, optionally `0x`
/// prefixed.
pub trait MessageSigner {
    /// Ask `account` to sign `message`.
    fn sign_message(
        &self,
        message: &str,
        account: &Address,
    ) -> impl Future<Output = Result<String, SignerError>>;
}

impl<S: MessageSigner> MessageSigner for &S {
    fn sign_message(
        &self,
        message: &str,
        account: &Address,
    ) -> impl Future<Output = Result<String, SignerError>> {
        (**self).sign_message(message, account)
    }
}
