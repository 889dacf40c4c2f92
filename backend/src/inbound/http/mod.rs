//! HTTP inbound adapter exposing the `/v1` REST endpoints.

pub mod auth;
pub mod catalogue;
pub mod comments;
pub mod error;
pub mod health;
pub mod identity;
pub mod pagination;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod titles;
pub mod token_config;
pub mod users;
pub(crate) mod validation;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{NormalizePath, TrailingSlash};
use actix_web::{Scope, web};

pub use error::ApiResult;

/// Register every `/v1` endpoint and the extractor error handlers.
///
/// `/users/me/` is registered ahead of `/users/{username}/` so the literal
/// segment wins.
pub fn configure_v1(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .service(auth::signup)
        .service(auth::obtain_token)
        .service(users::list_users)
        .service(users::create_user)
        .service(users::get_me)
        .service(users::update_me)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(catalogue::list_categories)
        .service(catalogue::create_category)
        .service(catalogue::delete_category)
        .service(catalogue::list_genres)
        .service(catalogue::create_genre)
        .service(catalogue::delete_genre)
        .service(titles::list_titles)
        .service(titles::create_title)
        .service(titles::get_title)
        .service(titles::update_title)
        .service(titles::delete_title)
        .service(reviews::list_reviews)
        .service(reviews::create_review)
        .service(reviews::get_review)
        .service(reviews::update_review)
        .service(reviews::delete_review)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(comments::get_comment)
        .service(comments::update_comment)
        .service(comments::delete_comment);
}

/// The `/v1` scope with every endpoint registered.
///
/// Paths inside the scope are normalised to end in a slash, so
/// `/v1/titles` and `/v1/titles/` reach the same handler.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use yamdb::inbound::http::api_scope;
///
/// let _app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    web::scope("/v1")
        .wrap(NormalizePath::new(TrailingSlash::Always))
        .configure(configure_v1)
}
