//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`EmailSender`], [`AccessTokenIssuer`]) are
//! implemented by outbound adapters. Driving ports (`*Service`) are
//! implemented by the domain and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token_issuer;
mod account_service;
mod catalogue_repository;
mod catalogue_service;
mod comment_repository;
mod comment_service;
mod email_sender;
mod pending_confirmation_repository;
mod review_repository;
mod review_service;
mod title_repository;
mod title_service;
mod user_repository;
mod user_service;

#[cfg(test)]
pub use access_token_issuer::MockAccessTokenIssuer;
pub use access_token_issuer::{AccessTokenError, AccessTokenIssuer};
pub use account_service::AccountService;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
pub use catalogue_service::CatalogueService;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError, NewComment};
pub use comment_service::{CommentService, ReviewPath};
#[cfg(test)]
pub use email_sender::MockEmailSender;
pub use email_sender::{EmailSender, EmailSenderError, OutgoingEmail};
#[cfg(test)]
pub use pending_confirmation_repository::MockPendingConfirmationRepository;
pub use pending_confirmation_repository::{
    PendingConfirmationRepository, PendingConfirmationRepositoryError,
};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{NewReview, ReviewRepository, ReviewRepositoryError};
pub use review_service::ReviewService;
#[cfg(test)]
pub use title_repository::MockTitleRepository;
pub use title_repository::{TitleRepository, TitleRepositoryError};
pub use title_service::TitleService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
pub use user_service::UserService;
