//! Users, roles and the validated values they are built from.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;

/// Maximum length of a username.
pub const USERNAME_MAX: usize = 20;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 30;
/// Username reserved for the `/users/me/` route.
pub const RESERVED_USERNAME: &str = "me";

/// Validation errors raised while building user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    ReservedUsername,
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    UnknownRole { value: String },
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername
            | Self::UsernameTooLong { .. }
            | Self::UsernameInvalidCharacters
            | Self::ReservedUsername => "username",
            Self::EmptyEmail | Self::EmailTooLong { .. } | Self::InvalidEmail => "email",
            Self::UnknownRole { .. } => "role",
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::UsernameTooLong { .. } => "username_too_long",
            Self::UsernameInvalidCharacters => "username_invalid_characters",
            Self::ReservedUsername => "reserved_username",
            Self::EmptyEmail => "empty_email",
            Self::EmailTooLong { .. } => "email_too_long",
            Self::InvalidEmail => "invalid_email",
            Self::UnknownRole { .. } => "unknown_role",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, digits and @/./+/-/_ characters"
            ),
            Self::ReservedUsername => write!(f, "username `{RESERVED_USERNAME}` is reserved"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::UnknownRole { value } => {
                write!(f, "role `{value}` is not one of user, moderator, admin")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        Error::invalid_field(value.field(), value.code(), value.to_string())
    }
}

/// Database identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Unique login handle.
///
/// ## Invariants
/// - 1..=20 characters of letters, digits and `@ . + - _`.
///
/// # Examples
/// ```
/// use yamdb::domain::Username;
///
/// let name = Username::new("ada.l").unwrap();
/// assert_eq!(name.as_ref(), "ada.l");
/// assert!(Username::new("ada lovelace").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(raw.into())
    }

    /// Validate a username chosen for a new account; rejects the reserved name.
    pub fn for_registration(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = Self::new(raw)?;
        if username.is_reserved() {
            return Err(UserValidationError::ReservedUsername);
        }
        Ok(username)
    }

    fn from_owned(raw: String) -> Result<Self, UserValidationError> {
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if raw.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&raw) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(raw))
    }

    /// Whether this is the name reserved for the `me` route.
    pub fn is_reserved(&self) -> bool {
        self.0 == RESERVED_USERNAME
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Unique contact address used to deliver confirmation codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(raw.into())
    }

    fn from_owned(raw: String) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !looks_like_email(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

fn looks_like_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Coarse authorisation tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    /// Stored and serialised form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Registered account.
///
/// `is_staff` marks superusers created from the command line; staff are
/// treated as administrators regardless of `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
}

impl User {
    /// Administrators and staff manage every resource.
    pub fn is_admin(&self) -> bool {
        self.is_staff || self.role == Role::Admin
    }

    /// Moderators may edit or remove any review or comment.
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    /// Apply a partial profile update in place.
    pub fn apply(&mut self, changes: UserChanges) {
        let UserChanges {
            username,
            email,
            role,
            bio,
            first_name,
            last_name,
        } = changes;
        if let Some(value) = username {
            self.username = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        if let Some(value) = role {
            self.role = value;
        }
        if bio.is_some() {
            self.bio = bio;
        }
        if first_name.is_some() {
            self.first_name = first_name;
        }
        if last_name.is_some() {
            self.last_name = last_name;
        }
    }
}

/// Account data supplied when registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_staff: bool,
}

impl NewUser {
    /// Plain account with the default role, as created by self-signup.
    pub fn with_defaults(username: Username, email: EmailAddress) -> Self {
        Self {
            username,
            email,
            role: Role::default(),
            bio: None,
            first_name: None,
            last_name: None,
            is_staff: false,
        }
    }

    /// Staff administrator, as created by the `create-superuser` tool.
    pub fn superuser(username: Username, email: EmailAddress) -> Self {
        Self {
            role: Role::Admin,
            is_staff: true,
            ..Self::with_defaults(username, email)
        }
    }
}

/// Partial update of a user profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub role: Option<Role>,
    pub bio: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
