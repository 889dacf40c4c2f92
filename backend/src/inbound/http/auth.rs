//! Signup and token exchange handlers.
//!
//! ```text
//! POST /v1/auth/signup/ {"username":"ada","email":"ada@example.com"}
//! POST /v1/auth/token/  {"username":"ada","confirmation_code":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, SignupReceipt, SignupRequest, TokenRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Request body for `POST /v1/auth/signup/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SignupBody {
    #[schema(example = "ada")]
    pub username: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
}

impl TryFrom<SignupBody> for SignupRequest {
    type Error = Error;

    fn try_from(value: SignupBody) -> Result<Self, Self::Error> {
        let username = require(FieldName::new("username"), value.username)?;
        let email = require(FieldName::new("email"), value.email)?;
        Ok(Self::try_from_parts(&username, &email)?)
    }
}

/// Echo of a successful signup.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SignupResponse {
    pub email: String,
    pub username: String,
}

impl From<SignupReceipt> for SignupResponse {
    fn from(value: SignupReceipt) -> Self {
        Self {
            email: value.email.into(),
            username: value.username.into(),
        }
    }
}

/// Request body for `POST /v1/auth/token/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TokenBody {
    #[schema(example = "ada")]
    pub username: Option<String>,
    pub confirmation_code: Option<String>,
}

impl TryFrom<TokenBody> for TokenRequest {
    type Error = Error;

    fn try_from(value: TokenBody) -> Result<Self, Self::Error> {
        let username = require(FieldName::new("username"), value.username)?;
        let code = require(FieldName::new("confirmation_code"), value.confirmation_code)?;
        Ok(Self::try_from_parts(&username, &code)?)
    }
}

/// Issued bearer token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Register a new account and receive a confirmation code by email.
///
/// Expired confirmation codes are purged before the body is validated.
#[utoipa::path(
    post,
    path = "/v1/auth/signup/",
    request_body = SignupBody,
    responses(
        (status = 200, description = "Confirmation code sent", body = SignupResponse),
        (status = 400, description = "Invalid or already registered", body = Error),
        (status = 503, description = "Mail relay unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup/")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupBody>,
) -> ApiResult<HttpResponse> {
    state.accounts.purge_expired_confirmations().await?;
    let request = SignupRequest::try_from(payload.into_inner())?;
    let receipt = state.accounts.signup(&request).await?;
    Ok(HttpResponse::Ok().json(SignupResponse::from(receipt)))
}

/// Exchange a confirmation code for a bearer token.
///
/// Expired confirmation codes are purged before the body is validated.
#[utoipa::path(
    post,
    path = "/v1/auth/token/",
    request_body = TokenBody,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Wrong, expired or already used confirmation code", body = Error),
        (status = 404, description = "Unknown username", body = Error)
    ),
    tags = ["auth"],
    operation_id = "obtainToken",
    security([])
)]
#[post("/auth/token/")]
pub async fn obtain_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenBody>,
) -> ApiResult<HttpResponse> {
    state.accounts.purge_expired_confirmations().await?;
    let request = TokenRequest::try_from(payload.into_inner())?;
    let token = state.accounts.obtain_token(&request).await?;
    Ok(HttpResponse::Ok().json(TokenResponse {
        token: token.into(),
    }))
}

#[cfg(test)]
mod tests;
