//! Signup and token exchange services.
//!
//! Inbound adapters call [`AccountService::purge_expired_confirmations`]
//! before anything else in a signup or token request, so an expired code is
//! never visible to the lookups that follow.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AccessTokenIssuer, AccountService, EmailSender, OutgoingEmail, PendingConfirmationRepository,
    UserRepository,
};
use crate::domain::{
    AccessToken, ConfirmationCode, ConfirmationCodeSigner, Error, NewUser, PendingConfirmation,
    SignupReceipt, SignupRequest, TokenRequest, User, Username,
};

/// Subject line of the confirmation email.
pub const CONFIRMATION_SUBJECT: &str = "Email confirmation";

/// Body of the confirmation email for `code`.
pub fn confirmation_body(code: &ConfirmationCode) -> String {
    format!("Your confirmation code: {code}")
}

/// Collaborators of [`DomainAccountService`].
#[derive(Clone)]
pub struct AccountServiceDeps {
    pub users: Arc<dyn UserRepository>,
    pub pending: Arc<dyn PendingConfirmationRepository>,
    pub mailer: Arc<dyn EmailSender>,
    pub tokens: Arc<dyn AccessTokenIssuer>,
    pub signer: Arc<ConfirmationCodeSigner>,
    pub clock: Arc<dyn Clock>,
}

/// Account service implementing the [`AccountService`] driving port.
#[derive(Clone)]
pub struct DomainAccountService {
    deps: AccountServiceDeps,
}

impl DomainAccountService {
    /// Create a service over the given collaborators.
    pub fn new(deps: AccountServiceDeps) -> Self {
        Self { deps }
    }

    /// Store a fresh code for `user` and mail it to their address.
    async fn deliver_code(&self, user: &User) -> Result<ConfirmationCode, Error> {
        let now = self.deps.clock.utc();
        let code = self.deps.signer.issue(user, now);
        let pending =
            PendingConfirmation::issue(user.username.clone(), user.email.clone(), code, now);
        self.deps.pending.upsert(&pending).await?;

        self.deps
            .mailer
            .send(&OutgoingEmail {
                to: user.email.clone(),
                subject: CONFIRMATION_SUBJECT.to_owned(),
                body: confirmation_body(&pending.code),
            })
            .await?;
        info!(username = %user.username, "confirmation code issued");
        Ok(pending.code)
    }

    async fn ensure_available(&self, request: &SignupRequest) -> Result<(), Error> {
        let users = &self.deps.users;
        if users.find_by_username(request.username()).await?.is_some() {
            return Err(Error::invalid_field(
                "username",
                "duplicate_username",
                "username already registered",
            ));
        }
        let pending_email = self.deps.pending.email_exists(request.email()).await?;
        if pending_email || users.find_by_email(request.email()).await?.is_some() {
            return Err(Error::invalid_field(
                "email",
                "duplicate_email",
                "email already registered",
            ));
        }
        Ok(())
    }
}

fn wrong_code() -> Error {
    Error::invalid_field(
        "confirmation_code",
        "wrong_confirmation_code",
        "wrong confirmation code",
    )
}

#[async_trait]
impl AccountService for DomainAccountService {
    async fn purge_expired_confirmations(&self) -> Result<u64, Error> {
        let purged = self.deps.pending.purge_expired(self.deps.clock.utc()).await?;
        if purged > 0 {
            debug!(purged, "removed expired confirmation codes");
        }
        Ok(purged)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupReceipt, Error> {
        self.ensure_available(request).await?;

        let user = self
            .deps
            .users
            .create(&NewUser::with_defaults(
                request.username().clone(),
                request.email().clone(),
            ))
            .await?;
        self.deliver_code(&user).await?;

        Ok(SignupReceipt {
            username: user.username,
            email: user.email,
        })
    }

    async fn reissue_confirmation(&self, username: &Username) -> Result<ConfirmationCode, Error> {
        self.purge_expired_confirmations().await?;
        let user = self
            .deps
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        self.deliver_code(&user).await
    }

    async fn obtain_token(&self, request: &TokenRequest) -> Result<AccessToken, Error> {
        let user = self
            .deps
            .users
            .find_by_username(request.username())
            .await?
            .ok_or_else(|| Error::not_found("user not found"))?;
        let Some(pending) = self.deps.pending.find_by_username(&user.username).await? else {
            debug!(username = %user.username, "no live confirmation code");
            return Err(wrong_code());
        };

        let now = self.deps.clock.utc();
        if !pending.matches(request.code()) || !self.deps.signer.verify(&user, request.code(), now)
        {
            debug!(username = %user.username, "rejected confirmation code");
            return Err(wrong_code());
        }

        self.deps.pending.delete(&pending.email).await?;
        let token = self.deps.tokens.issue(&user, now)?;
        info!(username = %user.username, "access token issued");
        Ok(token)
    }

    async fn authenticate(&self, bearer: &str) -> Result<User, Error> {
        let user_id = self.deps.tokens.verify(bearer, self.deps.clock.utc())?;
        self.deps
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::unauthorized("user for this token no longer exists"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
