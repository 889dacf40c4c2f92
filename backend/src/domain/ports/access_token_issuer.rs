//! Port for minting and checking bearer access tokens.
use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token issuers.
    pub enum AccessTokenError {
        /// The token could not be signed.
        Encode { message: String } => "failed to sign access token: {message}",
        /// The token is malformed, tampered with or of the wrong type.
        Invalid { message: String } => "invalid access token: {message}",
        /// The token is past its expiry.
        Expired => "access token has expired",
    }
}

/// Signs and verifies bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenIssuer: Send + Sync {
    /// Issue a token for `user` valid from `now`.
    fn issue(&self, user: &User, now: DateTime<Utc>) -> Result<AccessToken, AccessTokenError>;

    /// Verify `token` at `now` and return the user it was issued to.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AccessTokenError>;
}
