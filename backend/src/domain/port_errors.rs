//! Mapping from driven-port failures to transport-agnostic [`Error`]s.
//!
//! Connection failures become `service_unavailable`, query failures become
//! `internal_error` and uniqueness violations become field-level
//! `invalid_request` errors carrying the user-facing message.

use crate::domain::Error;
use crate::domain::ports::{
    AccessTokenError, CatalogueRepositoryError, CommentRepositoryError, EmailSenderError,
    PendingConfirmationRepositoryError, ReviewRepositoryError, TitleRepositoryError,
    UserRepositoryError,
};

impl From<UserRepositoryError> for Error {
    fn from(value: UserRepositoryError) -> Self {
        match value {
            UserRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserRepositoryError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            err @ UserRepositoryError::DuplicateUsername => {
                Error::invalid_field("username", "duplicate_username", err.to_string())
            }
            err @ UserRepositoryError::DuplicateEmail => {
                Error::invalid_field("email", "duplicate_email", err.to_string())
            }
            UserRepositoryError::NotFound => Error::not_found("user not found"),
        }
    }
}

impl From<PendingConfirmationRepositoryError> for Error {
    fn from(value: PendingConfirmationRepositoryError) -> Self {
        match value {
            PendingConfirmationRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("confirmation store unavailable: {message}"))
            }
            PendingConfirmationRepositoryError::Query { message } => {
                Error::internal(format!("confirmation store error: {message}"))
            }
        }
    }
}

impl From<CatalogueRepositoryError> for Error {
    fn from(value: CatalogueRepositoryError) -> Self {
        match value {
            CatalogueRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
            }
            CatalogueRepositoryError::Query { message } => {
                Error::internal(format!("catalogue repository error: {message}"))
            }
            err @ CatalogueRepositoryError::DuplicateSlug { .. } => {
                Error::invalid_field("slug", "duplicate_slug", err.to_string())
            }
        }
    }
}

impl From<TitleRepositoryError> for Error {
    fn from(value: TitleRepositoryError) -> Self {
        match value {
            TitleRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("title repository unavailable: {message}"))
            }
            TitleRepositoryError::Query { message } => {
                Error::internal(format!("title repository error: {message}"))
            }
            err @ TitleRepositoryError::UnknownCategory { .. } => {
                Error::invalid_field("category", "unknown_category", err.to_string())
            }
            err @ TitleRepositoryError::UnknownGenre { .. } => {
                Error::invalid_field("genre", "unknown_genre", err.to_string())
            }
            TitleRepositoryError::NotFound => Error::not_found("title not found"),
        }
    }
}

impl From<ReviewRepositoryError> for Error {
    fn from(value: ReviewRepositoryError) -> Self {
        match value {
            ReviewRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("review repository unavailable: {message}"))
            }
            ReviewRepositoryError::Query { message } => {
                Error::internal(format!("review repository error: {message}"))
            }
            err @ ReviewRepositoryError::DuplicateReview => {
                Error::invalid_field("title", "duplicate_review", err.to_string())
            }
            ReviewRepositoryError::NotFound => Error::not_found("review not found"),
        }
    }
}

impl From<CommentRepositoryError> for Error {
    fn from(value: CommentRepositoryError) -> Self {
        match value {
            CommentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("comment repository unavailable: {message}"))
            }
            CommentRepositoryError::Query { message } => {
                Error::internal(format!("comment repository error: {message}"))
            }
            CommentRepositoryError::NotFound => Error::not_found("comment not found"),
        }
    }
}

impl From<EmailSenderError> for Error {
    fn from(value: EmailSenderError) -> Self {
        match value {
            EmailSenderError::Message { message } => {
                Error::internal(format!("confirmation email rejected: {message}"))
            }
            EmailSenderError::Transport { message } => {
                Error::service_unavailable(format!("confirmation email not sent: {message}"))
            }
        }
    }
}

impl From<AccessTokenError> for Error {
    fn from(value: AccessTokenError) -> Self {
        match value {
            AccessTokenError::Encode { message } => {
                Error::internal(format!("failed to issue access token: {message}"))
            }
            err @ (AccessTokenError::Invalid { .. } | AccessTokenError::Expired) => {
                Error::unauthorized(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Status family chosen for each port failure.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserRepositoryError::connection("down").into(), ErrorCode::ServiceUnavailable)]
    #[case(UserRepositoryError::query("boom").into(), ErrorCode::InternalError)]
    #[case(UserRepositoryError::duplicate_email().into(), ErrorCode::InvalidRequest)]
    #[case(CatalogueRepositoryError::duplicate_slug("rock").into(), ErrorCode::InvalidRequest)]
    #[case(TitleRepositoryError::not_found().into(), ErrorCode::NotFound)]
    #[case(ReviewRepositoryError::duplicate_review().into(), ErrorCode::InvalidRequest)]
    #[case(EmailSenderError::transport("refused").into(), ErrorCode::ServiceUnavailable)]
    #[case(AccessTokenError::expired().into(), ErrorCode::Unauthorized)]
    #[case(AccessTokenError::encode("bad key").into(), ErrorCode::InternalError)]
    fn port_errors_map_to_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn duplicate_review_keeps_user_facing_message() {
        let error: Error = ReviewRepositoryError::duplicate_review().into();
        assert_eq!(error.message(), "cannot leave more than one review per title");
        assert_eq!(
            error.details(),
            Some(&serde_json::json!({"field": "title", "code": "duplicate_review"}))
        );
    }
}
