//! Comment handlers nested under
//! `/v1/titles/{title_id}/reviews/{review_id}/comments/`.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ReviewPath;
use crate::domain::{Actor, Comment, CommentId, CommentText, Error, ReviewId, TitleId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, PageSchema, paginated};
use crate::inbound::http::state::HttpState;

/// Comment representation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CommentBody {
    pub id: i64,
    pub text: String,
    /// Author username.
    #[schema(example = "ada")]
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentBody {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.get(),
            text: value.text,
            author: value.author_username.into(),
            pub_date: value.pub_date,
        }
    }
}

/// Create or update payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CommentPayload {
    pub text: Option<String>,
}

fn review_path(title_id: i64, review_id: i64) -> ReviewPath {
    ReviewPath {
        title_id: TitleId::new(title_id),
        review_id: ReviewId::new(review_id),
    }
}

/// List comments on a review.
#[utoipa::path(
    get,
    path = "/v1/titles/{title_id}/reviews/{review_id}/comments/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Comments", body = PageSchema<CommentBody>),
        (status = 404, description = "No such review under this title", body = Error)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/titles/{title_id}/reviews/{review_id}/comments/")]
pub async fn list_comments(
    req: HttpRequest,
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
    page: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let (title_id, review_id) = path.into_inner();
    let request = page.into_inner().to_request()?;
    let comments = state
        .comments
        .list(&actor, review_path(title_id, review_id), request)
        .await?;
    paginated(&req, comments, request, CommentBody::from)
}

/// Comment on a review.
#[utoipa::path(
    post,
    path = "/v1/titles/{title_id}/reviews/{review_id}/comments/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier")
    ),
    request_body = CommentPayload,
    responses(
        (status = 201, description = "Comment created", body = CommentBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "No such review under this title", body = Error)
    ),
    tags = ["comments"],
    operation_id = "createComment",
    security(("BearerAuth" = []))
)]
#[post("/titles/{title_id}/reviews/{review_id}/comments/")]
pub async fn create_comment(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64)>,
    payload: web::Json<CommentPayload>,
) -> ApiResult<HttpResponse> {
    actor.require_user()?;
    let (title_id, review_id) = path.into_inner();
    let text = CommentText::new(payload.into_inner().text)?;
    let comment = state
        .comments
        .create(&actor, review_path(title_id, review_id), text)
        .await?;
    Ok(HttpResponse::Created().json(CommentBody::from(comment)))
}

/// Fetch one comment.
#[utoipa::path(
    get,
    path = "/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier"),
        ("comment_id" = i64, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Comment", body = CommentBody),
        (status = 404, description = "No such comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "getComment",
    security([])
)]
#[get("/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/")]
pub async fn get_comment(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64, i64)>,
) -> ApiResult<web::Json<CommentBody>> {
    let (title_id, review_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .get(
            &actor,
            review_path(title_id, review_id),
            CommentId::new(comment_id),
        )
        .await?;
    Ok(web::Json(comment.into()))
}

/// Replace a comment's text; authors, moderators and administrators only.
#[utoipa::path(
    patch,
    path = "/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier"),
        ("comment_id" = i64, Path, description = "Comment identifier")
    ),
    request_body = CommentPayload,
    responses(
        (status = 200, description = "Updated comment", body = CommentBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "updateComment",
    security(("BearerAuth" = []))
)]
#[patch("/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/")]
pub async fn update_comment(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64, i64)>,
    payload: web::Json<CommentPayload>,
) -> ApiResult<web::Json<CommentBody>> {
    actor.require_user()?;
    let (title_id, review_id, comment_id) = path.into_inner();
    let text = CommentText::new(payload.into_inner().text)?;
    let comment = state
        .comments
        .update(
            &actor,
            review_path(title_id, review_id),
            CommentId::new(comment_id),
            text,
        )
        .await?;
    Ok(web::Json(comment.into()))
}

/// Remove a comment.
#[utoipa::path(
    delete,
    path = "/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/",
    params(
        ("title_id" = i64, Path, description = "Title identifier"),
        ("review_id" = i64, Path, description = "Review identifier"),
        ("comment_id" = i64, Path, description = "Comment identifier")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "No such comment", body = Error)
    ),
    tags = ["comments"],
    operation_id = "deleteComment",
    security(("BearerAuth" = []))
)]
#[delete("/titles/{title_id}/reviews/{review_id}/comments/{comment_id}/")]
pub async fn delete_comment(
    actor: Actor,
    state: web::Data<HttpState>,
    path: web::Path<(i64, i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (title_id, review_id, comment_id) = path.into_inner();
    state
        .comments
        .delete(
            &actor,
            review_path(title_id, review_id),
            CommentId::new(comment_id),
        )
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
