//! Handler tests for user administration and profiles.

use super::*;
use crate::inbound::http::test_utils::{TestHarness, test_app};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn harness() -> TestHarness {
    TestHarness::new()
}

async fn call(
    harness: &TestHarness,
    request: actix_test::TestRequest,
    caller: Option<&User>,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(harness)).await;
    let request = match caller {
        Some(user) => request.insert_header((AUTHORIZATION, harness.bearer(user))),
        None => request,
    };
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn admin_lists_users_with_envelope(harness: TestHarness) {
    let admin = harness.seed_user("root", Role::Admin).await;
    harness.seed_user("ada", Role::User).await;
    harness.seed_user("adam", Role::User).await;

    let (status, body) = call(
        &harness,
        actix_test::TestRequest::get().uri("/v1/users/?search=ada&limit=1"),
        Some(&admin),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["username"], "ada");
    assert!(body["previous"].is_null());
    assert!(
        body["next"]
            .as_str()
            .is_some_and(|next| next.contains("search=ada") && next.contains("offset=1"))
    );
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some(Role::User), StatusCode::FORBIDDEN)]
#[case(Some(Role::Moderator), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn non_admins_cannot_list(
    harness: TestHarness,
    #[case] role: Option<Role>,
    #[case] expected: StatusCode,
) {
    let caller = match role {
        Some(role) => Some(harness.seed_user("caller", role).await),
        None => None,
    };

    let (status, _) = call(
        &harness,
        actix_test::TestRequest::get().uri("/v1/users/"),
        caller.as_ref(),
    )
    .await;

    assert_eq!(status, expected);
}

#[rstest]
#[actix_web::test]
async fn admin_creates_user_with_role(harness: TestHarness) {
    let admin = harness.seed_user("root", Role::Admin).await;

    let (status, body) = call(
        &harness,
        actix_test::TestRequest::post()
            .uri("/v1/users/")
            .set_json(json!({"username": "mod", "email": "mod@example.com", "role": "moderator"})),
        Some(&admin),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "username": "mod",
            "email": "mod@example.com",
            "first_name": null,
            "last_name": null,
            "bio": null,
            "role": "moderator"
        })
    );
}

#[rstest]
#[case(json!({"username": "me", "email": "me@example.com"}), "reserved_username")]
#[case(json!({"username": "x", "email": "x@example.com", "role": "owner"}), "unknown_role")]
#[case(json!({"username": "root", "email": "other@example.com"}), "duplicate_username")]
#[actix_web::test]
async fn create_rejects_invalid_payloads(
    harness: TestHarness,
    #[case] payload: Value,
    #[case] code: &str,
) {
    let admin = harness.seed_user("root", Role::Admin).await;

    let (status, body) = call(
        &harness,
        actix_test::TestRequest::post().uri("/v1/users/").set_json(payload),
        Some(&admin),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn me_returns_own_profile(harness: TestHarness) {
    let ada = harness.seed_user("ada", Role::User).await;

    let (status, body) = call(
        &harness,
        actix_test::TestRequest::get().uri("/v1/users/me/"),
        Some(&ada),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert_eq!(body["role"], "user");
}

#[rstest]
#[actix_web::test]
async fn me_patch_ignores_role(harness: TestHarness) {
    let ada = harness.seed_user("ada", Role::User).await;

    let (status, body) = call(
        &harness,
        actix_test::TestRequest::patch()
            .uri("/v1/users/me/")
            .set_json(json!({"bio": "mathematician", "role": "admin"})),
        Some(&ada),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "mathematician");
    assert_eq!(body["role"], "user");
}

#[rstest]
#[actix_web::test]
async fn me_requires_authentication(harness: TestHarness) {
    let (status, body) = call(
        &harness,
        actix_test::TestRequest::get().uri("/v1/users/me"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn admin_patches_and_deletes_by_username(harness: TestHarness) {
    let admin = harness.seed_user("root", Role::Admin).await;
    harness.seed_user("ada", Role::User).await;

    let (patched, body) = call(
        &harness,
        actix_test::TestRequest::patch()
            .uri("/v1/users/ada/")
            .set_json(json!({"role": "moderator", "email": "ada@example.com"})),
        Some(&admin),
    )
    .await;
    let (deleted, _) = call(
        &harness,
        actix_test::TestRequest::delete().uri("/v1/users/ada/"),
        Some(&admin),
    )
    .await;
    let (missing, _) = call(
        &harness,
        actix_test::TestRequest::get().uri("/v1/users/ada/"),
        Some(&admin),
    )
    .await;

    assert_eq!(patched, StatusCode::OK);
    assert_eq!(body["role"], "moderator");
    assert_eq!(deleted, StatusCode::NO_CONTENT);
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn invalid_username_in_path_is_not_found(harness: TestHarness) {
    let admin = harness.seed_user("root", Role::Admin).await;

    let (status, _) = call(
        &harness,
        actix_test::TestRequest::get().uri("/v1/users/bad%20name/"),
        Some(&admin),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
