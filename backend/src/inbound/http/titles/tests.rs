//! Handler tests for titles.

use crate::domain::{CatalogueKind, Role};
use crate::inbound::http::test_utils::{TestHarness, test_app};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test as actix_test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

async fn catalogue() -> TestHarness {
    let harness = TestHarness::new();
    harness.seed_entry(CatalogueKind::Category, "film").await;
    harness.seed_entry(CatalogueKind::Category, "book").await;
    harness.seed_entry(CatalogueKind::Genre, "sci-fi").await;
    harness.seed_entry(CatalogueKind::Genre, "drama").await;
    harness
}

#[fixture]
fn harness() -> TestHarness {
    TestHarness::new()
}

async fn send(
    harness: &TestHarness,
    request: actix_test::TestRequest,
    bearer: Option<String>,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(harness)).await;
    let request = match bearer {
        Some(value) => request.insert_header((AUTHORIZATION, value)),
        None => request,
    };
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let bytes = actix_test::read_body(response).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn create_answers_with_write_shape() {
    let harness = catalogue().await;
    let admin = harness.seed_user("root", Role::Admin).await;

    let (status, body) = send(
        &harness,
        actix_test::TestRequest::post().uri("/v1/titles/").set_json(json!({
            "name": "Solaris",
            "year": 1972,
            "genre": ["sci-fi", "drama"],
            "category": "film"
        })),
        Some(harness.bearer(&admin)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "name": "Solaris",
            "year": 1972,
            "description": null,
            "genre": ["sci-fi", "drama"],
            "category": "film"
        })
    );
}

#[rstest]
#[case(json!({"name": "X", "year": 1972, "genre": ["sci-fi"], "category": "opera"}), "unknown_category")]
#[case(json!({"name": "X", "year": 1972, "genre": ["western"], "category": "film"}), "unknown_genre")]
#[case(json!({"name": "X", "year": 2024, "genre": ["sci-fi"], "category": "film"}), "year_out_of_range")]
#[case(json!({"name": "X", "year": 1972, "genre": ["sci-fi"]}), "missing_field")]
#[actix_web::test]
async fn create_rejects_invalid_titles(#[case] payload: Value, #[case] code: &str) {
    let harness = catalogue().await;
    let admin = harness.seed_user("root", Role::Admin).await;

    let (status, body) = send(
        &harness,
        actix_test::TestRequest::post()
            .uri("/v1/titles/")
            .set_json(payload),
        Some(harness.bearer(&admin)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn read_shape_nests_catalogue_and_rating() {
    let harness = catalogue().await;
    let title = harness
        .seed_title("Solaris", 1972, "film", &["sci-fi", "drama"])
        .await;
    let ada = harness.seed_user("ada", Role::User).await;
    let bob = harness.seed_user("bob", Role::User).await;
    harness.seed_review(&title, &ada, 7).await;
    harness.seed_review(&title, &bob, 8).await;

    let (status, body) = send(
        &harness,
        actix_test::TestRequest::get().uri(&format!("/v1/titles/{}/", title.id)),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rating"], 7);
    assert_eq!(body["category"], json!({"name": "film", "slug": "film"}));
    assert_eq!(body["genre"][0], json!({"name": "sci-fi", "slug": "sci-fi"}));
}

#[rstest]
#[actix_web::test]
async fn unrated_title_has_null_rating() {
    let harness = catalogue().await;
    let title = harness.seed_title("Solaris", 1972, "film", &[]).await;

    let (_, body) = send(
        &harness,
        actix_test::TestRequest::get().uri(&format!("/v1/titles/{}", title.id)),
        None,
    )
    .await;

    assert!(body["rating"].is_null());
}

#[rstest]
#[case("?genre=sci", 1)]
#[case("?category=boo", 1)]
#[case("?name=Sol", 1)]
#[case("?name=Stalk", 1)]
#[case("?name=sol", 0)]
#[case("?year=1961", 1)]
#[case("", 2)]
#[actix_web::test]
async fn list_filters(#[case] query: &str, #[case] expected: u64) {
    let harness = catalogue().await;
    harness.seed_title("Solaris", 1972, "film", &["sci-fi"]).await;
    harness.seed_title("Stalker", 1961, "book", &["drama"]).await;

    let (status, body) = send(
        &harness,
        actix_test::TestRequest::get().uri(&format!("/v1/titles/{query}")),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], expected);
}

#[rstest]
#[actix_web::test]
async fn patch_changes_only_supplied_fields() {
    let harness = catalogue().await;
    let title = harness.seed_title("Solaris", 1972, "film", &["sci-fi"]).await;
    let admin = harness.seed_user("root", Role::Admin).await;

    let (status, body) = send(
        &harness,
        actix_test::TestRequest::patch()
            .uri(&format!("/v1/titles/{}/", title.id))
            .set_json(json!({"category": "book"})),
        Some(harness.bearer(&admin)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "book");
    assert_eq!(body["name"], "Solaris");
    assert_eq!(body["genre"], json!(["sci-fi"]));
}

#[rstest]
#[case(Role::User)]
#[case(Role::Moderator)]
#[actix_web::test]
async fn non_admins_cannot_delete(#[case] role: Role) {
    let harness = catalogue().await;
    let title = harness.seed_title("Solaris", 1972, "film", &[]).await;
    let caller = harness.seed_user("caller", role).await;

    let (status, _) = send(
        &harness,
        actix_test::TestRequest::delete().uri(&format!("/v1/titles/{}/", title.id)),
        Some(harness.bearer(&caller)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn non_numeric_id_is_not_found(harness: TestHarness) {
    let (status, _) = send(
        &harness,
        actix_test::TestRequest::get().uri("/v1/titles/solaris/"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn missing_title_is_not_found(harness: TestHarness) {
    let (status, body) = send(
        &harness,
        actix_test::TestRequest::get().uri("/v1/titles/42/"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}
