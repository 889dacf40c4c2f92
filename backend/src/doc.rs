//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/v1` handler and the health probes, and
//! registers the bearer token security scheme. The document backs Swagger UI
//! in debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Role};
use crate::inbound::http::auth::{SignupBody, SignupResponse, TokenBody, TokenResponse};
use crate::inbound::http::catalogue::{CatalogueBody, CataloguePayload};
use crate::inbound::http::comments::{CommentBody, CommentPayload};
use crate::inbound::http::reviews::{ReviewBody, ReviewPayload};
use crate::inbound::http::titles::{TitleBody, TitlePayload, TitleWriteBody};
use crate::inbound::http::users::{UserBody, UserPayload};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /v1/auth/token/, sent as `Authorization: Bearer <token>`.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "YamDB API",
        description = "Reviews and ratings of films, books and music, with moderated comment threads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::obtain_token,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_me,
        crate::inbound::http::users::update_me,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::catalogue::list_categories,
        crate::inbound::http::catalogue::create_category,
        crate::inbound::http::catalogue::delete_category,
        crate::inbound::http::catalogue::list_genres,
        crate::inbound::http::catalogue::create_genre,
        crate::inbound::http::catalogue::delete_genre,
        crate::inbound::http::titles::list_titles,
        crate::inbound::http::titles::create_title,
        crate::inbound::http::titles::get_title,
        crate::inbound::http::titles::update_title,
        crate::inbound::http::titles::delete_title,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::get_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::get_comment,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        SignupBody,
        SignupResponse,
        TokenBody,
        TokenResponse,
        UserBody,
        UserPayload,
        CatalogueBody,
        CataloguePayload,
        TitleBody,
        TitleWriteBody,
        TitlePayload,
        ReviewBody,
        ReviewPayload,
        CommentBody,
        CommentPayload,
    )),
    tags(
        (name = "auth", description = "Signup and token exchange"),
        (name = "users", description = "User administration and the caller's profile"),
        (name = "catalogue", description = "Categories and genres"),
        (name = "titles", description = "Reviewable works"),
        (name = "reviews", description = "Scored reviews of titles"),
        (name = "comments", description = "Comments on reviews"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
