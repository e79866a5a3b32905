//! Credential Source Port - Supplies bearer tokens to backend clients.
//!
//! HTTP clients never own the session. They ask a credential source for the
//! current token and report back when the backend rejects it, which lets the
//! session context tear itself down without the clients depending on it.

use async_trait::async_trait;
use secrecy::SecretString;

/// Port for obtaining the current bearer token.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// The token to send, or `None` when signed out.
    fn bearer_token(&self) -> Option<SecretString>;

    /// Called when an authenticated request came back 401.
    ///
    /// Implementations must drop the session and its persisted token.
    async fn on_unauthorized(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_source_is_object_safe() {
        fn check<T: CredentialSource + ?Sized>() {}
        check::<dyn CredentialSource>();
    }
}
