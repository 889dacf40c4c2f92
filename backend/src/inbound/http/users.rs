//! User administration and self-service profile handlers.
//!
//! ```text
//! GET    /v1/users/?search=ad
//! POST   /v1/users/ {"username":"ada","email":"ada@example.com","role":"moderator"}
//! GET    /v1/users/me/
//! PATCH  /v1/users/{username}/ {"bio":"..."}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Actor, EmailAddress, Error, NewUser, Role, User, UserChanges, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, PageSchema, paginated};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// User representation returned by every user endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct UserBody {
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Role,
}

impl From<User> for UserBody {
    fn from(value: User) -> Self {
        Self {
            username: value.username.into(),
            email: value.email.into(),
            first_name: value.first_name,
            last_name: value.last_name,
            bio: value.bio,
            role: value.role,
        }
    }
}

/// Create or partial-update payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UserPayload {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    /// One of `user`, `moderator`, `admin`.
    #[schema(example = "user")]
    pub role: Option<String>,
}

impl UserPayload {
    fn into_new_user(self) -> Result<NewUser, Error> {
        let username = require(FieldName::new("username"), self.username)?;
        let email = require(FieldName::new("email"), self.email)?;
        let role = self.role.as_deref().map(str::parse::<Role>).transpose()?;
        Ok(NewUser {
            role: role.unwrap_or_default(),
            bio: self.bio,
            first_name: self.first_name,
            last_name: self.last_name,
            ..NewUser::with_defaults(
                Username::for_registration(username)?,
                EmailAddress::new(email)?,
            )
        })
    }

    fn into_changes(self) -> Result<UserChanges, Error> {
        Ok(UserChanges {
            username: self.username.map(Username::new).transpose()?,
            email: self.email.map(EmailAddress::new).transpose()?,
            role: self.role.as_deref().map(str::parse::<Role>).transpose()?,
            bio: self.bio,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

/// `search` filter for the user listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearch {
    /// Username substring.
    pub search: Option<String>,
}

fn username_from_path(raw: String) -> Result<Username, Error> {
    Username::new(raw.clone()).map_err(|_| Error::not_found(format!("user `{raw}` not found")))
}

/// List accounts.
#[utoipa::path(
    get,
    path = "/v1/users/",
    params(UserSearch, PageQuery),
    responses(
        (status = 200, description = "Users", body = PageSchema<UserBody>),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("BearerAuth" = []))
)]
#[get("/users/")]
pub async fn list_users(
    req: HttpRequest,
    actor: Actor,
    state: web::Data<HttpState>,
    search: web::Query<UserSearch>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = page.into_inner().to_request()?;
    let users = state
        .users
        .list(&actor, search.into_inner().search, request)
        .await?;
    paginated(&req, users, request, UserBody::from)
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/v1/users/",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security(("BearerAuth" = []))
)]
#[post("/users/")]
pub async fn create_user(
    actor: Actor,
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    actor.require_user()?;
    let user = payload.into_inner().into_new_user()?;
    let created = state.users.create(&actor, user).await?;
    Ok(HttpResponse::Created().json(UserBody::from(created)))
}

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/v1/users/me/",
    responses(
        (status = 200, description = "Own profile", body = UserBody),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "getMe",
    security(("BearerAuth" = []))
)]
#[get("/users/me/")]
pub async fn get_me(actor: Actor, state: web::Data<HttpState>) -> ApiResult<web::Json<UserBody>> {
    let user = state.users.me(&actor).await?;
    Ok(web::Json(user.into()))
}

/// Update the caller's own profile; `role` is ignored.
#[utoipa::path(
    patch,
    path = "/v1/users/me/",
    request_body = UserPayload,
    responses(
        (status = 200, description = "Updated profile", body = UserBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateMe",
    security(("BearerAuth" = []))
)]
#[patch("/users/me/")]
pub async fn update_me(
    actor: Actor,
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<web::Json<UserBody>> {
    actor.require_user()?;
    let changes = UserPayload {
        role: None,
        ..payload.into_inner()
    }
    .into_changes()?;
    let user = state.users.update_me(&actor, changes).await?;
    Ok(web::Json(user.into()))
}

/// Fetch an account by username.
#[utoipa::path(
    get,
    path = "/v1/users/{username}/",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 200, description = "User", body = UserBody),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security(("BearerAuth" = []))
)]
#[get("/users/{username}/")]
pub async fn get_user(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserBody>> {
    let username = username_from_path(path.into_inner())?;
    let user = state.users.get(&actor, &username).await?;
    Ok(web::Json(user.into()))
}

/// Partially update an account.
#[utoipa::path(
    patch,
    path = "/v1/users/{username}/",
    params(("username" = String, Path, description = "Account username")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "Updated user", body = UserBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security(("BearerAuth" = []))
)]
#[patch("/users/{username}/")]
pub async fn update_user(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserPayload>,
) -> ApiResult<web::Json<UserBody>> {
    actor.require_user()?;
    let username = username_from_path(path.into_inner())?;
    let changes = payload.into_inner().into_changes()?;
    let user = state.users.update(&actor, &username, changes).await?;
    Ok(web::Json(user.into()))
}

/// Remove an account with its reviews and comments.
#[utoipa::path(
    delete,
    path = "/v1/users/{username}/",
    params(("username" = String, Path, description = "Account username")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security(("BearerAuth" = []))
)]
#[delete("/users/{username}/")]
pub async fn delete_user(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let username = username_from_path(path.into_inner())?;
    state.users.delete(&actor, &username).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
