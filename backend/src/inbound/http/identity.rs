//! Bearer token authentication for HTTP handlers.
//!
//! Handlers take an [`Actor`] argument. Requests without an `Authorization`
//! header are anonymous; a header that is present must carry a valid
//! `Bearer` token or the request fails with `401 Unauthorized`.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Actor, Error};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Extract the token from an `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, Error> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid text"))?;
    let (scheme, token) = raw
        .trim()
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(Error::unauthorized(
            "authorization header must use the Bearer scheme",
        ));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::unauthorized("bearer token is empty"));
    }
    Ok(Some(token.to_owned()))
}

impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token? else {
                return Ok(Actor::Anonymous);
            };
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
            match state.accounts.authenticate(&token).await {
                Ok(user) => Ok(Actor::Authenticated(user)),
                Err(error) => {
                    debug!(error = %error.message(), "rejected bearer token");
                    Err(error.into())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::inbound::http::test_utils::TestHarness;
    use actix_web::http::StatusCode;
    use actix_web::http::header::HeaderValue;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header value"),
        );
        headers
    }

    #[rstest]
    fn absent_header_is_anonymous() {
        assert_eq!(bearer_token(&HeaderMap::new()), Ok(None));
    }

    #[rstest]
    #[case("Bearer abc.def", "abc.def")]
    #[case("bearer   abc.def  ", "abc.def")]
    fn token_is_extracted(#[case] header: &str, #[case] expected: &str) {
        assert_eq!(
            bearer_token(&headers_with(header)),
            Ok(Some(expected.to_owned()))
        );
    }

    #[rstest]
    #[case("Basic dXNlcjpwYXNz")]
    #[case("Bearer")]
    #[case("Token abc")]
    fn other_schemes_are_unauthorized(#[case] header: &str) {
        let err = bearer_token(&headers_with(header)).expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    async fn whoami(actor: Actor) -> HttpResponse {
        match actor {
            Actor::Anonymous => HttpResponse::Ok().body("anonymous"),
            Actor::Authenticated(user) => HttpResponse::Ok().body(user.username.to_string()),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_token_resolves_user() {
        let harness = TestHarness::new();
        let user = harness.seed_user("ada", crate::domain::Role::User).await;
        let token = harness.token_for(&user);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let body = actix_test::call_and_read_body(&app, request).await;

        assert_eq!(body.as_ref(), b"ada");
    }

    #[rstest]
    #[actix_web::test]
    async fn garbage_token_is_rejected() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let request = actix_test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_header_is_anonymous() {
        let harness = TestHarness::new();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(harness.state()))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let request = actix_test::TestRequest::get().uri("/whoami").to_request();
        let body = actix_test::call_and_read_body(&app, request).await;

        assert_eq!(body.as_ref(), b"anonymous");
    }
}
