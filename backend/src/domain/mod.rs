//! Domain primitives, policies and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, the access policies guarding them, and the services that
//! implement the driving ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Role, Username, EmailAddress: accounts and their validated parts.
//! - CatalogueEntry, Title, Review, Comment: the reviewable catalogue.
//! - Policy, Actor, Access, Subject: role-based authorisation.
//! - Domain*Service: driving port implementations.

pub mod account_service;
pub mod auth;
pub mod catalogue;
pub mod catalogue_service;
pub mod confirmation;
pub mod error;
pub mod permissions;
mod port_errors;
pub mod ports;
pub mod review;
pub mod review_service;
pub mod title;
pub mod title_service;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::account_service::{
    AccountServiceDeps, CONFIRMATION_SUBJECT, DomainAccountService, confirmation_body,
};
pub use self::auth::{
    AccessToken, AuthValidationError, SignupReceipt, SignupRequest, TokenRequest,
};
pub use self::catalogue::{
    CATALOGUE_NAME_MAX, CatalogueEntry, CatalogueKind, CatalogueValidationError, SLUG_MAX, Slug,
};
pub use self::catalogue_service::DomainCatalogueService;
pub use self::confirmation::{
    CONFIRMATION_TTL_MINUTES, ConfirmationCode, ConfirmationCodeSigner, PendingConfirmation,
    SignerKeyError, confirmation_ttl,
};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::permissions::{Access, Actor, Decision, Policy, Subject};
pub use self::review::{
    Comment, CommentId, CommentText, Review, ReviewChanges, ReviewDraft, ReviewId, ReviewInput,
    ReviewValidationError, SCORE_MAX, SCORE_MIN, Score,
};
pub use self::review_service::{DomainCommentService, DomainReviewService};
pub use self::title::{
    Rating, TITLE_NAME_MAX, Title, TitleChanges, TitleDraft, TitleFilter, TitleId, TitleInput,
    TitleValidationError, validate_year,
};
pub use self::title_service::DomainTitleService;
pub use self::trace_id::TraceId;
pub use self::user::{
    EMAIL_MAX, EmailAddress, NewUser, RESERVED_USERNAME, Role, USERNAME_MAX, User, UserChanges,
    UserId, UserValidationError, Username,
};
pub use self::user_service::DomainUserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use yamdb::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
