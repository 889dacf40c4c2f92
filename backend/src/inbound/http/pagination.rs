//! Query parsing and response envelopes for paginated list endpoints.

use actix_web::{HttpRequest, HttpResponse};
use pagination::{Page, PageRequest, Paginated};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::{IntoParams, ToSchema};

use crate::domain::Error;
use crate::inbound::http::ApiResult;

/// `limit`/`offset` query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Maximum number of results (default 10, capped at 100).
    pub limit: Option<u32>,
    /// Number of results to skip.
    pub offset: Option<u64>,
}

impl PageQuery {
    /// Validate the window.
    pub fn to_request(self) -> Result<PageRequest, Error> {
        PageRequest::new(self.limit, self.offset)
            .map_err(|err| Error::invalid_field("limit", "invalid_limit", err.to_string()))
    }
}

/// OpenAPI shape of the pagination envelope.
#[derive(Serialize, ToSchema)]
pub struct PageSchema<T: ToSchema> {
    /// Total number of matches.
    pub count: u64,
    /// Absolute link to the next window.
    pub next: Option<String>,
    /// Absolute link to the previous window.
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Absolute URL of the current request, used to derive navigation links.
pub fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let info = req.connection_info();
    let raw = format!("{}://{}{}", info.scheme(), info.host(), req.uri());
    Url::parse(&raw).map_err(|err| Error::internal(format!("request URL is invalid: {err}")))
}

/// Respond with `page` wrapped in the pagination envelope, converting each
/// item with `to_body`.
pub fn paginated<T, B, F>(
    req: &HttpRequest,
    page: Page<T>,
    request: PageRequest,
    to_body: F,
) -> ApiResult<HttpResponse>
where
    B: Serialize,
    F: FnMut(T) -> B,
{
    let url = request_url(req)?;
    let body = Paginated::from_page(page.map(to_body), request, &url);
    Ok(HttpResponse::Ok().json(body))
}
