//! Validated inputs for the signup and token exchange flows.
//!
//! Handlers build these from raw JSON strings so services only ever see
//! well-formed usernames, addresses and codes.

use std::fmt;

use crate::domain::{
    ConfirmationCode, EmailAddress, Error, UserValidationError, Username,
};

/// Validation failures for auth payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Username or email failed user validation.
    User(UserValidationError),
    /// Confirmation code was missing or blank.
    EmptyConfirmationCode,
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(inner) => write!(f, "{inner}"),
            Self::EmptyConfirmationCode => write!(f, "confirmation code must not be empty"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

impl From<UserValidationError> for AuthValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

impl From<AuthValidationError> for Error {
    fn from(value: AuthValidationError) -> Self {
        match value {
            AuthValidationError::User(inner) => inner.into(),
            AuthValidationError::EmptyConfirmationCode => Error::invalid_field(
                "confirmation_code",
                "empty_confirmation_code",
                "confirmation code must not be empty",
            ),
        }
    }
}

/// Self-registration request.
///
/// # Examples
/// ```
/// use yamdb::domain::SignupRequest;
///
/// let request = SignupRequest::try_from_parts("ada", "ada@example.com").unwrap();
/// assert_eq!(request.username().as_ref(), "ada");
/// assert!(SignupRequest::try_from_parts("me", "me@example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupRequest {
    username: Username,
    email: EmailAddress,
}

impl SignupRequest {
    /// Validate raw signup fields; the reserved username is rejected here.
    pub fn try_from_parts(username: &str, email: &str) -> Result<Self, AuthValidationError> {
        Ok(Self {
            username: Username::for_registration(username)?,
            email: EmailAddress::new(email)?,
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Address that will receive the confirmation code.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Request to exchange a confirmation code for an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    username: Username,
    code: ConfirmationCode,
}

impl TokenRequest {
    /// Validate raw token exchange fields.
    pub fn try_from_parts(username: &str, code: &str) -> Result<Self, AuthValidationError> {
        let username = Username::new(username)?;
        let code = ConfirmationCode::new(code).ok_or(AuthValidationError::EmptyConfirmationCode)?;
        Ok(Self { username, code })
    }

    /// Username the code was issued to.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Submitted confirmation code.
    pub fn code(&self) -> &ConfirmationCode {
        &self.code
    }
}

/// Result of a successful signup, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupReceipt {
    pub username: Username,
    pub email: EmailAddress,
}

/// Signed bearer token handed to a confirmed user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AccessToken> for String {
    fn from(value: AccessToken) -> Self {
        value.0
    }
}
