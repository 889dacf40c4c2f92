//! Title handlers.
//!
//! Reads return the nested representation with the derived rating; create
//! and update answer with the write representation, where genres and the
//! category are plain slugs.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Actor, Error, Title, TitleFilter, TitleId, TitleInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::catalogue::CatalogueBody;
use crate::inbound::http::pagination::{PageQuery, PageSchema, paginated};
use crate::inbound::http::state::HttpState;

/// Title as returned by reads.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TitleBody {
    pub id: i64,
    #[schema(example = "Solaris")]
    pub name: String,
    #[schema(example = 1972)]
    pub year: i32,
    /// Mean review score truncated to an integer; `null` without reviews.
    pub rating: Option<i64>,
    pub description: Option<String>,
    pub genre: Vec<CatalogueBody>,
    pub category: Option<CatalogueBody>,
}

impl From<Title> for TitleBody {
    fn from(value: Title) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            year: value.year,
            rating: value.rating.map(|rating| rating.truncated()),
            description: value.description,
            genre: value.genres.into_iter().map(CatalogueBody::from).collect(),
            category: value.category.map(CatalogueBody::from),
        }
    }
}

/// Title as returned by create and update.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct TitleWriteBody {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    /// Genre slugs.
    pub genre: Vec<String>,
    /// Category slug.
    pub category: Option<String>,
}

impl From<Title> for TitleWriteBody {
    fn from(value: Title) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            year: value.year,
            description: value.description,
            genre: value
                .genres
                .into_iter()
                .map(|genre| genre.slug.to_string())
                .collect(),
            category: value.category.map(|category| category.slug.to_string()),
        }
    }
}

/// Create or partial-update payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct TitlePayload {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Genre slugs.
    #[schema(example = json!(["sci-fi", "drama"]))]
    pub genre: Option<Vec<String>>,
    /// Category slug.
    #[schema(example = "film")]
    pub category: Option<String>,
}

impl From<TitlePayload> for TitleInput {
    fn from(value: TitlePayload) -> Self {
        Self {
            name: value.name,
            year: value.year,
            description: value.description,
            category: value.category,
            genres: value.genre,
        }
    }
}

/// Title listing filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TitleQuery {
    /// Genre slug substring.
    pub genre: Option<String>,
    /// Category slug substring.
    pub category: Option<String>,
    /// Name substring.
    pub name: Option<String>,
    /// Exact release year.
    pub year: Option<i32>,
}

impl From<TitleQuery> for TitleFilter {
    fn from(value: TitleQuery) -> Self {
        Self {
            genre: value.genre,
            category: value.category,
            name: value.name,
            year: value.year,
        }
    }
}

/// List titles.
#[utoipa::path(
    get,
    path = "/v1/titles/",
    params(TitleQuery, PageQuery),
    responses(
        (status = 200, description = "Titles", body = PageSchema<TitleBody>),
        (status = 400, description = "Malformed query", body = Error)
    ),
    tags = ["titles"],
    operation_id = "listTitles",
    security([])
)]
#[get("/titles/")]
pub async fn list_titles(
    req: HttpRequest,
    actor: Actor,
    state: web::Data<HttpState>,
    filter: web::Query<TitleQuery>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = page.into_inner().to_request()?;
    let titles = state
        .titles
        .list(&actor, filter.into_inner().into(), request)
        .await?;
    paginated(&req, titles, request, TitleBody::from)
}

/// Create a title.
#[utoipa::path(
    post,
    path = "/v1/titles/",
    request_body = TitlePayload,
    responses(
        (status = 201, description = "Title created", body = TitleWriteBody),
        (status = 400, description = "Invalid request or unknown slug", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["titles"],
    operation_id = "createTitle",
    security(("BearerAuth" = []))
)]
#[post("/titles/")]
pub async fn create_title(
    actor: Actor,
    state: web::Data<HttpState>,
    payload: web::Json<TitlePayload>,
) -> ApiResult<HttpResponse> {
    let title = state
        .titles
        .create(&actor, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(TitleWriteBody::from(title)))
}

/// Fetch a title with its rating.
#[utoipa::path(
    get,
    path = "/v1/titles/{title_id}/",
    params(("title_id" = i64, Path, description = "Title identifier")),
    responses(
        (status = 200, description = "Title", body = TitleBody),
        (status = 404, description = "No such title", body = Error)
    ),
    tags = ["titles"],
    operation_id = "getTitle",
    security([])
)]
#[get("/titles/{title_id}/")]
pub async fn get_title(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TitleBody>> {
    let title = state
        .titles
        .get(&actor, TitleId::new(path.into_inner()))
        .await?;
    Ok(web::Json(title.into()))
}

/// Partially update a title.
#[utoipa::path(
    patch,
    path = "/v1/titles/{title_id}/",
    params(("title_id" = i64, Path, description = "Title identifier")),
    request_body = TitlePayload,
    responses(
        (status = 200, description = "Updated title", body = TitleWriteBody),
        (status = 400, description = "Invalid request or unknown slug", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such title", body = Error)
    ),
    tags = ["titles"],
    operation_id = "updateTitle",
    security(("BearerAuth" = []))
)]
#[patch("/titles/{title_id}/")]
pub async fn update_title(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<TitlePayload>,
) -> ApiResult<web::Json<TitleWriteBody>> {
    let title = state
        .titles
        .update(
            &actor,
            TitleId::new(path.into_inner()),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(title.into()))
}

/// Remove a title with its reviews and comments.
#[utoipa::path(
    delete,
    path = "/v1/titles/{title_id}/",
    params(("title_id" = i64, Path, description = "Title identifier")),
    responses(
        (status = 204, description = "Title deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such title", body = Error)
    ),
    tags = ["titles"],
    operation_id = "deleteTitle",
    security(("BearerAuth" = []))
)]
#[delete("/titles/{title_id}/")]
pub async fn delete_title(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .titles
        .delete(&actor, TitleId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests;
