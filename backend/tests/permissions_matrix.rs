//! Role-by-endpoint access checks over the full `/v1` stack.
//!
//! Each case seeds a small catalogue, signs the request as the given role (or
//! sends none) and asserts only the status code family.

#[path = "support/http.rs"]
mod http;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use http::send;
use rstest::rstest;
use serde_json::json;
use yamdb::domain::{CatalogueKind, Role, Title, User};
use yamdb::test_support::TestHarness;

/// Who signs the request.
#[derive(Debug, Clone, Copy)]
enum Caller {
    Anonymous,
    Author,
    Other,
    Moderator,
    Admin,
}

struct Fixture {
    harness: TestHarness,
    title: Title,
    review_id: i64,
    author: User,
    other: User,
    moderator: User,
    admin: User,
}

impl Fixture {
    async fn new() -> Self {
        let harness = TestHarness::new();
        harness.seed_entry(CatalogueKind::Category, "film").await;
        harness.seed_entry(CatalogueKind::Genre, "drama").await;
        let title = harness.seed_title("Stalker", 1979, "film", &["drama"]).await;
        let author = harness.seed_user("author", Role::User).await;
        let other = harness.seed_user("other", Role::User).await;
        let moderator = harness.seed_user("moderator", Role::Moderator).await;
        let admin = harness.seed_user("admin", Role::Admin).await;
        let review = harness.seed_review(&title, &author, 8).await;
        Self {
            harness,
            title,
            review_id: review.id.get(),
            author,
            other,
            moderator,
            admin,
        }
    }

    fn bearer(&self, caller: Caller) -> Option<String> {
        let user = match caller {
            Caller::Anonymous => return None,
            Caller::Author => &self.author,
            Caller::Other => &self.other,
            Caller::Moderator => &self.moderator,
            Caller::Admin => &self.admin,
        };
        Some(self.harness.bearer(user))
    }

    async fn status(&self, request: TestRequest, caller: Caller) -> StatusCode {
        let bearer = self.bearer(caller);
        send(&self.harness, request, bearer.as_deref()).await.status
    }
}

#[rstest]
#[case(Caller::Anonymous, StatusCode::UNAUTHORIZED)]
#[case(Caller::Author, StatusCode::FORBIDDEN)]
#[case(Caller::Moderator, StatusCode::FORBIDDEN)]
#[case(Caller::Admin, StatusCode::OK)]
#[actix_web::test]
async fn user_administration_is_admin_only(#[case] caller: Caller, #[case] expected: StatusCode) {
    let fixture = Fixture::new().await;
    let status = fixture
        .status(TestRequest::get().uri("/v1/users/"), caller)
        .await;
    assert_eq!(status, expected);
}

#[rstest]
#[case(Caller::Anonymous, StatusCode::UNAUTHORIZED)]
#[case(Caller::Other, StatusCode::OK)]
#[case(Caller::Moderator, StatusCode::OK)]
#[actix_web::test]
async fn own_profile_needs_any_signed_in_user(
    #[case] caller: Caller,
    #[case] expected: StatusCode,
) {
    let fixture = Fixture::new().await;
    let status = fixture
        .status(TestRequest::get().uri("/v1/users/me/"), caller)
        .await;
    assert_eq!(status, expected);
}

#[rstest]
#[case(Caller::Anonymous, StatusCode::UNAUTHORIZED)]
#[case(Caller::Other, StatusCode::FORBIDDEN)]
#[case(Caller::Moderator, StatusCode::FORBIDDEN)]
#[case(Caller::Admin, StatusCode::CREATED)]
#[actix_web::test]
async fn catalogue_writes_need_admin(#[case] caller: Caller, #[case] expected: StatusCode) {
    let fixture = Fixture::new().await;
    let status = fixture
        .status(
            TestRequest::post()
                .uri("/v1/genres/")
                .set_json(json!({"name": "Comedy", "slug": "comedy"})),
            caller,
        )
        .await;
    assert_eq!(status, expected);
}

#[rstest]
#[case("/v1/categories/")]
#[case("/v1/genres/")]
#[case("/v1/titles/")]
#[actix_web::test]
async fn catalogue_reads_are_public(#[case] uri: &str) {
    let fixture = Fixture::new().await;
    let status = fixture
        .status(TestRequest::get().uri(uri), Caller::Anonymous)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[case(Caller::Anonymous, StatusCode::UNAUTHORIZED)]
#[case(Caller::Other, StatusCode::FORBIDDEN)]
#[case(Caller::Moderator, StatusCode::FORBIDDEN)]
#[case(Caller::Admin, StatusCode::OK)]
#[actix_web::test]
async fn title_edits_need_admin(#[case] caller: Caller, #[case] expected: StatusCode) {
    let fixture = Fixture::new().await;
    let status = fixture
        .status(
            TestRequest::patch()
                .uri(&format!("/v1/titles/{}/", fixture.title.id))
                .set_json(json!({"description": "A zone"})),
            caller,
        )
        .await;
    assert_eq!(status, expected);
}

#[rstest]
#[case(Caller::Anonymous, StatusCode::UNAUTHORIZED)]
#[case(Caller::Author, StatusCode::NO_CONTENT)]
#[case(Caller::Other, StatusCode::FORBIDDEN)]
#[case(Caller::Moderator, StatusCode::NO_CONTENT)]
#[case(Caller::Admin, StatusCode::NO_CONTENT)]
#[actix_web::test]
async fn review_removal_follows_ownership(#[case] caller: Caller, #[case] expected: StatusCode) {
    let fixture = Fixture::new().await;
    let status = fixture
        .status(
            TestRequest::delete().uri(&format!(
                "/v1/titles/{}/reviews/{}/",
                fixture.title.id, fixture.review_id
            )),
            caller,
        )
        .await;
    assert_eq!(status, expected);
}

#[rstest]
#[actix_web::test]
async fn paths_without_trailing_slash_are_normalised() {
    let fixture = Fixture::new().await;
    let status = fixture
        .status(
            TestRequest::get().uri(&format!("/v1/titles/{}", fixture.title.id)),
            Caller::Anonymous,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn garbage_token_is_unauthorised_even_on_public_reads() {
    let fixture = Fixture::new().await;
    let reply = send(
        &fixture.harness,
        TestRequest::get().uri("/v1/titles/"),
        Some("Bearer not-a-jwt"),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["code"], "unauthorized");
}
