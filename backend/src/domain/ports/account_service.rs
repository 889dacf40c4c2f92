//! Driving port for self-registration and token exchange.
//!
//! Inbound adapters call this port to sign users up, trade confirmation codes
//! for bearer tokens and resolve bearer tokens back to accounts.

use async_trait::async_trait;

use crate::domain::{
    AccessToken, ConfirmationCode, Error, SignupReceipt, SignupRequest, TokenRequest, User,
    Username,
};

/// Domain use-case port for account onboarding and authentication.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Delete confirmation codes whose window has closed; returns the count.
    async fn purge_expired_confirmations(&self) -> Result<u64, Error>;

    /// Register a new user and email them a confirmation code.
    async fn signup(&self, request: &SignupRequest) -> Result<SignupReceipt, Error>;

    /// Issue and mail a fresh confirmation code to an existing account.
    ///
    /// Replaces any code still pending for the account's email address.
    async fn reissue_confirmation(&self, username: &Username) -> Result<ConfirmationCode, Error>;

    /// Exchange a confirmation code for an access token.
    async fn obtain_token(&self, request: &TokenRequest) -> Result<AccessToken, Error>;

    /// Resolve a bearer token to the account it was issued to.
    async fn authenticate(&self, bearer: &str) -> Result<User, Error>;
}
