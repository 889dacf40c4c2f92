//! In-process HTTP helpers shared by the integration suites.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test::{self as actix_test, TestRequest};
use actix_web::{App, web};
use serde_json::Value;
use yamdb::Trace;
use yamdb::domain::TRACE_ID_HEADER;
use yamdb::inbound::http::api_scope;
use yamdb::test_support::TestHarness;

/// Status, trace header and JSON body of one response.
pub struct Reply {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub body: Value,
}

/// Send `request` through the full `/v1` stack over `harness`.
pub async fn send(harness: &TestHarness, request: TestRequest, bearer: Option<&str>) -> Reply {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(harness.state()))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;
    let request = match bearer {
        Some(value) => request.insert_header((AUTHORIZATION, value.to_owned())),
        None => request,
    };
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = actix_test::read_body(response).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        trace_id,
        body,
    }
}
