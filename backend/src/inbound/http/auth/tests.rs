//! Handler tests for signup and token exchange.

use super::*;
use crate::domain::ports::{AccessTokenIssuer, PendingConfirmationRepository, UserRepository};
use crate::domain::{EmailAddress, NewUser, Username};
use crate::outbound::memory::{MemoryPendingConfirmationRepository, MemoryUserRepository};
use crate::inbound::http::test_utils::{RecordingEmailSender, TestHarness, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn harness() -> TestHarness {
    TestHarness::new()
}

async fn post_json(harness: &TestHarness, uri: &str, body: Value) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(harness)).await;
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

async fn signup_ada(harness: &TestHarness) -> String {
    let (status, _) = post_json(
        harness,
        "/v1/auth/signup/",
        json!({"username": "ada", "email": "ada@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    harness
        .mailer
        .last_code_for("ada@example.com")
        .expect("confirmation code mailed")
}

#[rstest]
#[actix_web::test]
async fn signup_echoes_and_mails_code(harness: TestHarness) {
    let (status, body) = post_json(
        &harness,
        "/v1/auth/signup/",
        json!({"username": "ada", "email": "ada@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"email": "ada@example.com", "username": "ada"}));
    let sent = harness.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Email confirmation");
    assert!(sent[0].body.starts_with("Your confirmation code: "));
}

#[rstest]
#[case(json!({"email": "ada@example.com"}), "username", "missing_field")]
#[case(json!({"username": "ada"}), "email", "missing_field")]
#[case(json!({"username": "me", "email": "me@example.com"}), "username", "reserved_username")]
#[actix_web::test]
async fn invalid_signup_names_the_field(
    harness: TestHarness,
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let (status, body) = post_json(&harness, "/v1/auth/signup/", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
    assert!(harness.mailer.sent().is_empty());
}

#[rstest]
#[actix_web::test]
async fn second_signup_with_same_email_is_rejected(harness: TestHarness) {
    signup_ada(&harness).await;

    let (status, body) = post_json(
        &harness,
        "/v1/auth/signup/",
        json!({"username": "lovelace", "email": "ada@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "email already registered");
}

#[rstest]
#[actix_web::test]
async fn mail_failure_is_service_unavailable() {
    let harness = TestHarness::with_mailer(RecordingEmailSender::failing());

    let (status, body) = post_json(
        &harness,
        "/v1/auth/signup/",
        json!({"username": "ada", "email": "ada@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}

#[rstest]
#[actix_web::test]
async fn confirmed_code_yields_token_for_user(harness: TestHarness) {
    let code = signup_ada(&harness).await;

    let (status, body) = post_json(
        &harness,
        "/v1/auth/token/",
        json!({"username": "ada", "confirmation_code": code}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token string");
    let user_id = harness
        .tokens
        .verify(token, harness.clock.utc())
        .expect("token verifies");
    assert_eq!(user_id.get(), 1);
}

#[rstest]
#[actix_web::test]
async fn code_is_single_use(harness: TestHarness) {
    let code = signup_ada(&harness).await;
    let payload = json!({"username": "ada", "confirmation_code": code});

    let (first, _) = post_json(&harness, "/v1/auth/token/", payload.clone()).await;
    let (second, _) = post_json(&harness, "/v1/auth/token/", payload).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn wrong_code_keeps_pending_record(harness: TestHarness) {
    let code = signup_ada(&harness).await;

    let (wrong, body) = post_json(
        &harness,
        "/v1/auth/token/",
        json!({"username": "ada", "confirmation_code": "abc-0000"}),
    )
    .await;
    let (retry, _) = post_json(
        &harness,
        "/v1/auth/token/",
        json!({"username": "ada", "confirmation_code": code}),
    )
    .await;

    assert_eq!(wrong, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "wrong confirmation code");
    assert_eq!(retry, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn unknown_username_is_not_found(harness: TestHarness) {
    let (status, _) = post_json(
        &harness,
        "/v1/auth/token/",
        json!({"username": "ghost", "confirmation_code": "abc-0000"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn expired_code_is_a_wrong_code(harness: TestHarness) {
    let code = signup_ada(&harness).await;
    harness.clock.advance_seconds(5 * 60 + 1);

    let (status, body) = post_json(
        &harness,
        "/v1/auth/token/",
        json!({"username": "ada", "confirmation_code": code}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "wrong confirmation code");
}

#[rstest]
#[actix_web::test]
async fn expired_codes_are_purged_before_validation(harness: TestHarness) {
    signup_ada(&harness).await;
    harness.clock.advance_seconds(5 * 60 + 1);

    let (status, body) = post_json(&harness, "/v1/auth/token/", json!({"username": "ada"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "confirmation_code");
    let email = EmailAddress::new("ada@example.com").expect("valid email");
    let still_pending = MemoryPendingConfirmationRepository::new(harness.store.clone())
        .email_exists(&email)
        .await
        .expect("store reachable");
    assert!(!still_pending);
}

#[rstest]
#[actix_web::test]
async fn superuser_exchanges_reissued_code_for_admin_access(harness: TestHarness) {
    let username = Username::new("root").expect("valid username");
    let email = EmailAddress::new("root@example.com").expect("valid email");
    MemoryUserRepository::new(harness.store.clone())
        .create(&NewUser::superuser(username.clone(), email))
        .await
        .expect("superuser stored");

    let code = harness
        .state()
        .accounts
        .reissue_confirmation(&username)
        .await
        .expect("code issued");
    assert_eq!(
        harness.mailer.last_code_for("root@example.com"),
        Some(code.to_string())
    );

    let (status, body) = post_json(
        &harness,
        "/v1/auth/token/",
        json!({"username": "root", "confirmation_code": code.to_string()}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token string");

    let app = actix_test::init_service(test_app(&harness)).await;
    let request = actix_test::TestRequest::get()
        .uri("/v1/users/")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_bad_request(harness: TestHarness) {
    let app = actix_test::init_service(test_app(&harness)).await;
    let request = actix_test::TestRequest::post()
        .uri("/v1/auth/token")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();

    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
