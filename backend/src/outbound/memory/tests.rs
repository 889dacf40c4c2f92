//! Behaviour of the shared in-memory store across repositories.

use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, CommentRepository, CommentRepositoryError,
    NewComment, NewReview, PendingConfirmationRepository, ReviewRepository,
    ReviewRepositoryError, TitleRepository, TitleRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    CatalogueKind, ConfirmationCode, EmailAddress, NewUser, Rating, Review, ReviewId, Slug,
    Title, TitleDraft, TitleFilter, User, Username,
};
use crate::test_support::fixture_now;

struct Repos {
    users: MemoryUserRepository,
    pending: MemoryPendingConfirmationRepository,
    catalogue: MemoryCatalogueRepository,
    titles: MemoryTitleRepository,
    reviews: MemoryReviewRepository,
    comments: MemoryCommentRepository,
}

#[fixture]
fn repos() -> Repos {
    let store = MemoryStore::new();
    Repos {
        users: MemoryUserRepository::new(store.clone()),
        pending: MemoryPendingConfirmationRepository::new(store.clone()),
        catalogue: MemoryCatalogueRepository::new(store.clone()),
        titles: MemoryTitleRepository::new(store.clone()),
        reviews: MemoryReviewRepository::new(store.clone()),
        comments: MemoryCommentRepository::new(store),
    }
}

fn new_user(name: &str) -> NewUser {
    NewUser::with_defaults(
        Username::new(name).expect("valid username"),
        EmailAddress::new(format!("{name}@example.com")).expect("valid email"),
    )
}

fn slug(raw: &str) -> Slug {
    Slug::new(raw).expect("valid slug")
}

fn entry(name: &str, raw_slug: &str) -> CatalogueEntry {
    CatalogueEntry::try_from_parts(name, raw_slug).expect("valid entry")
}

async fn seed_title(repos: &Repos, name: &str) -> Title {
    // Repeated seeding hits the slug uniqueness check, which is fine here.
    let _ = repos
        .catalogue
        .create(CatalogueKind::Category, &entry("Films", "films"))
        .await;
    let _ = repos
        .catalogue
        .create(CatalogueKind::Genre, &entry("Drama", "drama"))
        .await;
    repos
        .titles
        .create(&TitleDraft {
            name: name.to_owned(),
            year: 1972,
            description: None,
            category: slug("films"),
            genres: vec![slug("drama")],
        })
        .await
        .expect("title created")
}

async fn review(repos: &Repos, title: &Title, author: &User, score: i64) -> Review {
    repos
        .reviews
        .create(&NewReview {
            title_id: title.id,
            author: author.id,
            text: "noted".to_owned(),
            score: Score::new(score).expect("valid score"),
            pub_date: fixture_now(),
        })
        .await
        .expect("review created")
}

#[rstest]
#[tokio::test]
async fn usernames_and_emails_are_unique(repos: Repos) {
    repos.users.create(&new_user("ada")).await.expect("first insert");

    let same_name = repos.users.create(&new_user("ada")).await;
    assert_eq!(same_name, Err(UserRepositoryError::duplicate_username()));

    let mut same_email = new_user("grace");
    same_email.email = EmailAddress::new("ada@example.com").expect("valid email");
    let err = repos.users.create(&same_email).await;
    assert_eq!(err, Err(UserRepositoryError::duplicate_email()));
}

#[rstest]
#[tokio::test]
async fn update_ignores_own_row_for_uniqueness(repos: Repos) {
    let mut user = repos.users.create(&new_user("ada")).await.expect("insert");
    user.bio = Some("mathematician".to_owned());
    let updated = repos.users.update(&user).await.expect("update");
    assert_eq!(updated.bio.as_deref(), Some("mathematician"));
}

#[rstest]
#[tokio::test]
async fn user_search_is_case_insensitive(repos: Repos) {
    for name in ["Alice", "bob", "malice"] {
        repos.users.create(&new_user(name)).await.expect("insert");
    }
    let page = repos
        .users
        .list(Some(" ALI ".to_owned()), PageRequest::first())
        .await
        .expect("list");
    let names: Vec<&str> = page.items().iter().map(|u| u.username.as_ref()).collect();
    assert_eq!(names, vec!["Alice", "malice"]);
    assert_eq!(page.total(), 2);
}

#[rstest]
#[tokio::test]
async fn pending_upsert_replaces_by_email_and_purges(repos: Repos) {
    let now = fixture_now();
    let user = new_user("ada");
    let first = PendingConfirmation::issue(
        user.username.clone(),
        user.email.clone(),
        ConfirmationCode::new("first").expect("code"),
        now,
    );
    let second = PendingConfirmation {
        code: ConfirmationCode::new("second").expect("code"),
        ..first.clone()
    };
    repos.pending.upsert(&first).await.expect("upsert");
    repos.pending.upsert(&second).await.expect("upsert");

    let found = repos
        .pending
        .find_by_username(&user.username)
        .await
        .expect("lookup");
    assert_eq!(found, Some(second.clone()));

    let purged = repos
        .pending
        .purge_expired(second.expires_at)
        .await
        .expect("purge");
    assert_eq!(purged, 1);
    assert!(!repos.pending.email_exists(&user.email).await.expect("exists"));
}

#[rstest]
#[tokio::test]
async fn catalogue_slugs_are_unique_per_kind(repos: Repos) {
    repos
        .catalogue
        .create(CatalogueKind::Genre, &entry("Rock", "rock"))
        .await
        .expect("genre");
    let dup = repos
        .catalogue
        .create(CatalogueKind::Genre, &entry("Rock again", "rock"))
        .await;
    assert_eq!(dup, Err(CatalogueRepositoryError::duplicate_slug("rock")));

    repos
        .catalogue
        .create(CatalogueKind::Category, &entry("Rock", "rock"))
        .await
        .expect("categories have their own slug space");
}

#[rstest]
#[tokio::test]
async fn catalogue_lists_sorted_by_name(repos: Repos) {
    for (name, raw) in [("Western", "western"), ("Comedy", "comedy"), ("Drama", "drama")] {
        repos
            .catalogue
            .create(CatalogueKind::Genre, &entry(name, raw))
            .await
            .expect("genre");
    }
    let page = repos
        .catalogue
        .list(CatalogueKind::Genre, None, PageRequest::new(Some(2), None).expect("window"))
        .await
        .expect("list");
    let names: Vec<&str> = page.items().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Comedy", "Drama"]);
    assert_eq!(page.total(), 3);
}

#[rstest]
#[tokio::test]
async fn unknown_slugs_are_rejected_on_title_create(repos: Repos) {
    let err = repos
        .titles
        .create(&TitleDraft {
            name: "Solaris".to_owned(),
            year: 1972,
            description: None,
            category: slug("missing"),
            genres: Vec::new(),
        })
        .await;
    assert_eq!(err, Err(TitleRepositoryError::unknown_category("missing")));
}

#[rstest]
#[tokio::test]
async fn deleting_category_keeps_titles(repos: Repos) {
    let title = seed_title(&repos, "Solaris").await;
    assert!(
        repos
            .catalogue
            .delete(CatalogueKind::Category, &slug("films"))
            .await
            .expect("delete")
    );
    assert!(
        repos
            .catalogue
            .delete(CatalogueKind::Genre, &slug("drama"))
            .await
            .expect("delete")
    );
    let reloaded = repos.titles.find(title.id).await.expect("find").expect("kept");
    assert!(reloaded.category.is_none());
    assert!(reloaded.genres.is_empty());
}

#[rstest]
#[tokio::test]
async fn title_filters_are_case_sensitive(repos: Repos) {
    seed_title(&repos, "Solaris").await;
    let hit = TitleFilter {
        name: Some("olar".to_owned()),
        genre: Some("dra".to_owned()),
        ..TitleFilter::default()
    };
    let miss = TitleFilter {
        name: Some("SOLARIS".to_owned()),
        ..TitleFilter::default()
    };
    let found = repos.titles.list(&hit, PageRequest::first()).await.expect("list");
    let missed = repos.titles.list(&miss, PageRequest::first()).await.expect("list");
    assert_eq!(found.total(), 1);
    assert_eq!(missed.total(), 0);
}

#[rstest]
#[tokio::test]
async fn rating_tracks_reviews(repos: Repos) {
    let title = seed_title(&repos, "Solaris").await;
    let ada = repos.users.create(&new_user("ada")).await.expect("user");
    let bob = repos.users.create(&new_user("bob")).await.expect("user");
    review(&repos, &title, &ada, 7).await;
    review(&repos, &title, &bob, 8).await;

    let rated = repos.titles.find(title.id).await.expect("find").expect("present");
    assert_eq!(rated.rating.map(Rating::truncated), Some(7));
}

#[rstest]
#[tokio::test]
async fn second_review_by_same_author_is_rejected(repos: Repos) {
    let title = seed_title(&repos, "Solaris").await;
    let ada = repos.users.create(&new_user("ada")).await.expect("user");
    review(&repos, &title, &ada, 7).await;
    let again = repos
        .reviews
        .create(&NewReview {
            title_id: title.id,
            author: ada.id,
            text: "again".to_owned(),
            score: Score::new(1).expect("score"),
            pub_date: fixture_now(),
        })
        .await;
    assert_eq!(again, Err(ReviewRepositoryError::duplicate_review()));
}

#[rstest]
#[tokio::test]
async fn review_lookup_is_scoped_to_title(repos: Repos) {
    let title = seed_title(&repos, "Solaris").await;
    let other = seed_title(&repos, "Stalker").await;
    let ada = repos.users.create(&new_user("ada")).await.expect("user");
    let created = review(&repos, &title, &ada, 9).await;

    assert_eq!(
        repos.reviews.find(title.id, created.id).await.expect("find"),
        Some(created.clone())
    );
    assert_eq!(
        repos.reviews.find(other.id, created.id).await.expect("find"),
        None
    );
}

#[rstest]
#[tokio::test]
async fn deleting_title_cascades_to_reviews_and_comments(repos: Repos) {
    let title = seed_title(&repos, "Solaris").await;
    let ada = repos.users.create(&new_user("ada")).await.expect("user");
    let created = review(&repos, &title, &ada, 9).await;
    repos
        .comments
        .create(&NewComment {
            review_id: created.id,
            author: ada.id,
            text: "agreed".to_owned(),
            pub_date: fixture_now(),
        })
        .await
        .expect("comment");

    assert!(repos.titles.delete(title.id).await.expect("delete"));

    let reviews = repos.reviews.list(title.id, PageRequest::first()).await.expect("list");
    let comments = repos
        .comments
        .list(created.id, PageRequest::first())
        .await
        .expect("list");
    assert_eq!(reviews.total(), 0);
    assert_eq!(comments.total(), 0);
}

#[rstest]
#[tokio::test]
async fn deleting_user_removes_their_content(repos: Repos) {
    let title = seed_title(&repos, "Solaris").await;
    let ada = repos.users.create(&new_user("ada")).await.expect("user");
    let bob = repos.users.create(&new_user("bob")).await.expect("user");
    let kept = review(&repos, &title, &bob, 5).await;
    review(&repos, &title, &ada, 9).await;
    repos
        .comments
        .create(&NewComment {
            review_id: kept.id,
            author: ada.id,
            text: "nope".to_owned(),
            pub_date: fixture_now(),
        })
        .await
        .expect("comment");

    assert!(repos.users.delete(ada.id).await.expect("delete"));

    let reviews = repos.reviews.list(title.id, PageRequest::first()).await.expect("list");
    assert_eq!(reviews.items(), &[kept.clone()]);
    let comments = repos.comments.list(kept.id, PageRequest::first()).await.expect("list");
    assert_eq!(comments.total(), 0);
}

#[rstest]
#[tokio::test]
async fn comments_on_missing_review_are_not_found(repos: Repos) {
    let ada = repos.users.create(&new_user("ada")).await.expect("user");
    let result = repos
        .comments
        .create(&NewComment {
            review_id: ReviewId::new(404),
            author: ada.id,
            text: "lost".to_owned(),
            pub_date: fixture_now(),
        })
        .await;
    assert_eq!(result, Err(CommentRepositoryError::not_found()));
}
