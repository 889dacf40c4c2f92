//! Review handlers nested under `/v1/titles/{title_id}/reviews/`.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Actor, Error, Review, ReviewChanges, ReviewDraft, ReviewId, ReviewInput, TitleId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, PageSchema, paginated};
use crate::inbound::http::state::HttpState;

/// Review representation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ReviewBody {
    pub id: i64,
    pub text: String,
    /// Author username.
    #[schema(example = "ada")]
    pub author: String,
    #[schema(minimum = 1, maximum = 10)]
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewBody {
    fn from(value: Review) -> Self {
        Self {
            id: value.id.get(),
            text: value.text,
            author: value.author_username.into(),
            score: value.score.get(),
            pub_date: value.pub_date,
        }
    }
}

/// Create or partial-update payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct ReviewPayload {
    pub text: Option<String>,
    #[schema(minimum = 1, maximum = 10)]
    pub score: Option<i64>,
}

impl From<ReviewPayload> for ReviewInput {
    fn from(value: ReviewPayload) -> Self {
        Self {
            text: value.text,
            score: value.score,
        }
    }
}

/// List reviews of a title.
#[utoipa::path(
    get,
    path = "/v1/titles/{title_id}/reviews/",
    params(("title_id" = i64, Path, description = "Title identifier"), PageQuery),
    responses(
        (status = 200, description = "Reviews", body = PageSchema<ReviewBody>),
        (status = 404, description = "No such title", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/titles/{title_id}/reviews/")]
pub async fn list_reviews(
    req: HttpRequest,
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let request = page.into_inner().to_request()?;
    let reviews = state
        .reviews
        .list(&actor, TitleId::new(path.into_inner()), request)
        .await?;
    paginated(&req, reviews, request, ReviewBody::from)
}

/// Review a title; one review per author and title.
#[utoipa::path(
    post,
    path = "/v1/titles/{title_id}/reviews/",
    params(("title_id" = i64, Path, description = "Title identifier")),
    request_body = ReviewPayload,
    responses(
        (status = 201, description = "Review created", body = ReviewBody),
        (status = 400, description = "Invalid request or duplicate review", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such title", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("BearerAuth" = []))
)]
#[post("/titles/{title_id}/reviews/")]
pub async fn create_review(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<ReviewPayload>,
) -> ApiResult<HttpResponse> {
    actor.require_user()?;
    let draft = ReviewDraft::from_input(payload.into_inner().into())?;
    let review = state
        .reviews
        .create(&actor, TitleId::new(path.into_inner()), draft)
        .await?;
    Ok(HttpResponse::Created().json(ReviewBody::from(review)))
}

/// Fetch one review.
#[utoipa::path(
    get,
    path = "/v1/titles/{title_id}/reviews/{review_id}/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier")
    ),
    responses(
        (status = 200, description = "Review", body = ReviewBody),
        (status = 404, description = "No such review under this title", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "getReview",
    security([])
)]
#[get("/titles/{title_id}/reviews/{review_id}/")]
pub async fn get_review(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<web::Json<ReviewBody>> {
    let (title_id, review_id) = path.into_inner();
    let review = state
        .reviews
        .get(&actor, TitleId::new(title_id), ReviewId::new(review_id))
        .await?;
    Ok(web::Json(review.into()))
}

/// Edit a review; authors, moderators and administrators only.
#[utoipa::path(
    patch,
    path = "/v1/titles/{title_id}/reviews/{review_id}/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier")
    ),
    request_body = ReviewPayload,
    responses(
        (status = 200, description = "Updated review", body = ReviewBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such review under this title", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "updateReview",
    security(("BearerAuth" = []))
)]
#[patch("/titles/{title_id}/reviews/{review_id}/")]
pub async fn update_review(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
    payload: web::Json<ReviewPayload>,
) -> ApiResult<web::Json<ReviewBody>> {
    actor.require_user()?;
    let (title_id, review_id) = path.into_inner();
    let changes = ReviewChanges::from_input(payload.into_inner().into())?;
    let review = state
        .reviews
        .update(
            &actor,
            TitleId::new(title_id),
            ReviewId::new(review_id),
            changes,
        )
        .await?;
    Ok(web::Json(review.into()))
}

/// Remove a review with its comments.
#[utoipa::path(
    delete,
    path = "/v1/titles/{title_id}/reviews/{review_id}/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier")
    ),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such review under this title", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("BearerAuth" = []))
)]
#[delete("/titles/{title_id}/reviews/{review_id}/")]
pub async fn delete_review(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (title_id, review_id) = path.into_inner();
    state
        .reviews
        .delete(&actor, TitleId::new(title_id), ReviewId::new(review_id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
