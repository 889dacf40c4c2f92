//! Category and genre handlers.
//!
//! Both collections share one shape and differ only in the
//! [`CatalogueKind`] passed to the service.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Actor, CatalogueEntry, CatalogueKind, Error, Slug};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, PageSchema, paginated};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

/// Category or genre representation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CatalogueBody {
    #[schema(example = "Science fiction")]
    pub name: String,
    #[schema(example = "sci-fi")]
    pub slug: String,
}

impl From<CatalogueEntry> for CatalogueBody {
    fn from(value: CatalogueEntry) -> Self {
        Self {
            name: value.name,
            slug: value.slug.to_string(),
        }
    }
}

/// Create payload.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CataloguePayload {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl TryFrom<CataloguePayload> for CatalogueEntry {
    type Error = Error;

    fn try_from(value: CataloguePayload) -> Result<Self, Self::Error> {
        let name = require(FieldName::new("name"), value.name)?;
        let slug = require(FieldName::new("slug"), value.slug)?;
        Ok(Self::try_from_parts(&name, &slug)?)
    }
}

/// `search` filter for catalogue listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogueSearch {
    /// Name substring.
    pub search: Option<String>,
}

async fn list(
    kind: CatalogueKind,
    req: HttpRequest,
    actor: Actor,
    state: web::Data<HttpState>,
    search: CatalogueSearch,
    page: PageQuery,
) -> ApiResult<HttpResponse> {
    let request = page.to_request()?;
    let entries = state
        .catalogue
        .list(&actor, kind, search.search, request)
        .await?;
    paginated(&req, entries, request, CatalogueBody::from)
}

async fn create(
    kind: CatalogueKind,
    actor: Actor,
    state: web::Data<HttpState>,
    payload: CataloguePayload,
) -> ApiResult<HttpResponse> {
    actor.require_user()?;
    let entry = CatalogueEntry::try_from(payload)?;
    let created = state.catalogue.create(&actor, kind, entry).await?;
    Ok(HttpResponse::Created().json(CatalogueBody::from(created)))
}

async fn remove(
    kind: CatalogueKind,
    actor: Actor,
    state: web::Data<HttpState>,
    raw_slug: String,
) -> ApiResult<HttpResponse> {
    actor.require_user()?;
    let slug = Slug::new(raw_slug.clone())
        .map_err(|_| Error::not_found(format!("{} `{raw_slug}` not found", kind.noun())))?;
    state.catalogue.delete(&actor, kind, &slug).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List categories.
#[utoipa::path(
    get,
    path = "/v1/categories/",
    params(CatalogueSearch, PageQuery),
    responses((status = 200, description = "Categories", body = PageSchema<CatalogueBody>)),
    tags = ["catalogue"],
    operation_id = "listCategories",
    security([])
)]
#[get("/categories/")]
pub async fn list_categories(
    req: HttpRequest,
    actor: Actor,
    state: web::Data<HttpState>,
    search: web::Query<CatalogueSearch>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    list(
        CatalogueKind::Category,
        req,
        actor,
        state,
        search.into_inner(),
        page.into_inner(),
    )
    .await
}

/// Create a category.
#[utoipa::path(
    post,
    path = "/v1/categories/",
    request_body = CataloguePayload,
    responses(
        (status = 201, description = "Category created", body = CatalogueBody),
        (status = 400, description = "Invalid or duplicate slug", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "createCategory",
    security(("BearerAuth" = []))
)]
#[post("/categories/")]
pub async fn create_category(
    actor: Actor,
    state: web::Data<HttpState>,
    payload: web::Json<CataloguePayload>,
) -> ApiResult<HttpResponse> {
    create(CatalogueKind::Category, actor, state, payload.into_inner()).await
}

/// Delete a category; its titles keep existing without one.
#[utoipa::path(
    delete,
    path = "/v1/categories/{slug}/",
    params(("slug" = String, Path, description = "Category slug")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such category", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "deleteCategory",
    security(("BearerAuth" = []))
)]
#[delete("/categories/{slug}/")]
pub async fn delete_category(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove(CatalogueKind::Category, actor, state, path.into_inner()).await
}

/// List genres.
#[utoipa::path(
    get,
    path = "/v1/genres/",
    params(CatalogueSearch, PageQuery),
    responses((status = 200, description = "Genres", body = PageSchema<CatalogueBody>)),
    tags = ["catalogue"],
    operation_id = "listGenres",
    security([])
)]
#[get("/genres/")]
pub async fn list_genres(
    req: HttpRequest,
    actor: Actor,
    state: web::Data<HttpState>,
    search: web::Query<CatalogueSearch>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    list(
        CatalogueKind::Genre,
        req,
        actor,
        state,
        search.into_inner(),
        page.into_inner(),
    )
    .await
}

/// Create a genre.
#[utoipa::path(
    post,
    path = "/v1/genres/",
    request_body = CataloguePayload,
    responses(
        (status = 201, description = "Genre created", body = CatalogueBody),
        (status = 400, description = "Invalid or duplicate slug", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "createGenre",
    security(("BearerAuth" = []))
)]
#[post("/genres/")]
pub async fn create_genre(
    actor: Actor,
    state: web::Data<HttpState>,
    payload: web::Json<CataloguePayload>,
) -> ApiResult<HttpResponse> {
    create(CatalogueKind::Genre, actor, state, payload.into_inner()).await
}

/// Delete a genre; titles lose the link.
#[utoipa::path(
    delete,
    path = "/v1/genres/{slug}/",
    params(("slug" = String, Path, description = "Genre slug")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Administrators only", body = Error),
        (status = 404, description = "No such genre", body = Error)
    ),
    tags = ["catalogue"],
    operation_id = "deleteGenre",
    security(("BearerAuth" = []))
)]
#[delete("/genres/{slug}/")]
pub async fn delete_genre(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove(CatalogueKind::Genre, actor, state, path.into_inner()).await
}
