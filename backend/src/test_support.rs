//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccessTokenIssuer, CatalogueRepository, EmailSender, EmailSenderError, NewReview,
    OutgoingEmail, ReviewRepository, TitleRepository, UserRepository,
};
use crate::domain::{
    CatalogueEntry, CatalogueKind, ConfirmationCodeSigner, EmailAddress, NewUser, Review, Role,
    Score, Slug, Title, TitleDraft, User, UserId, Username,
};
use crate::inbound::http::state::{HttpState, HttpStateAdapters};
use crate::outbound::memory::{
    MemoryCatalogueRepository, MemoryCommentRepository, MemoryPendingConfirmationRepository,
    MemoryReviewRepository, MemoryStore, MemoryTitleRepository, MemoryUserRepository,
};
use crate::outbound::tokens::JwtAccessTokenIssuer;

/// Clock whose current time can be moved forward by tests.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed instant used across tests: 2024-05-01T12:00:00Z.
pub fn fixture_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single() {
        Some(now) => now,
        None => panic!("fixture timestamp is ambiguous"),
    }
}

/// Build a user with the given id, role and a derived username/email.
pub fn sample_user(id: i64, role: Role) -> User {
    let username = match Username::new(format!("user{id}")) {
        Ok(username) => username,
        Err(error) => panic!("fixture username: {error}"),
    };
    let email = match EmailAddress::new(format!("user{id}@example.com")) {
        Ok(email) => email,
        Err(error) => panic!("fixture email: {error}"),
    };
    User {
        id: UserId::new(id),
        username,
        email,
        role,
        bio: None,
        first_name: None,
        last_name: None,
        is_staff: false,
    }
}

/// Mail sender that keeps every message for later inspection.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingEmailSender {
    /// Sender whose transport always fails.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn lock_sent(&self) -> MutexGuard<'_, Vec<OutgoingEmail>> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every message handed to the sender so far.
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.lock_sent().clone()
    }

    /// Confirmation code from the latest message sent to `email`.
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.lock_sent()
            .iter()
            .rev()
            .find(|message| message.to.as_ref() == email)
            .and_then(|message| message.body.rsplit(' ').next())
            .map(str::to_owned)
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailSenderError> {
        if self.fail {
            return Err(EmailSenderError::transport("relay unreachable"));
        }
        self.lock_sent().push(email.clone());
        Ok(())
    }
}

/// Signing key shared by every harness.
pub fn test_key() -> Zeroizing<Vec<u8>> {
    Zeroizing::new(b"yamdb-test-signing-key-0123456789".to_vec())
}

/// HTTP state over in-memory adapters with a controllable clock and mailer.
pub struct TestHarness {
    pub store: MemoryStore,
    pub clock: Arc<MutableClock>,
    pub mailer: Arc<RecordingEmailSender>,
    pub tokens: Arc<JwtAccessTokenIssuer>,
    state: HttpState,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Harness with a working mailer and the clock at [`fixture_now`].
    pub fn new() -> Self {
        Self::with_mailer(RecordingEmailSender::default())
    }

    /// Harness delivering mail through `mailer`.
    pub fn with_mailer(mailer: RecordingEmailSender) -> Self {
        let store = MemoryStore::new();
        let clock = Arc::new(MutableClock::new(fixture_now()));
        let mailer = Arc::new(mailer);
        let key = test_key();
        let tokens = Arc::new(JwtAccessTokenIssuer::new(&key, TimeDelta::days(1)));
        let signer = match ConfirmationCodeSigner::new(&key) {
            Ok(signer) => Arc::new(signer),
            Err(error) => panic!("test signing key rejected: {error}"),
        };
        let state = HttpState::from_adapters(HttpStateAdapters {
            users: Arc::new(MemoryUserRepository::new(store.clone())),
            pending: Arc::new(MemoryPendingConfirmationRepository::new(store.clone())),
            catalogue: Arc::new(MemoryCatalogueRepository::new(store.clone())),
            titles: Arc::new(MemoryTitleRepository::new(store.clone())),
            reviews: Arc::new(MemoryReviewRepository::new(store.clone())),
            comments: Arc::new(MemoryCommentRepository::new(store.clone())),
            mailer: mailer.clone(),
            tokens: tokens.clone(),
            signer,
            clock: clock.clone(),
        });
        Self {
            store,
            clock,
            mailer,
            tokens,
            state,
        }
    }

    /// Handler state backed by this harness.
    pub fn state(&self) -> HttpState {
        self.state.clone()
    }

    /// Insert a user directly into the store.
    pub async fn seed_user(&self, username: &str, role: Role) -> User {
        let username = match Username::new(username) {
            Ok(username) => username,
            Err(error) => panic!("fixture username: {error}"),
        };
        let email = match EmailAddress::new(format!("{username}@example.com")) {
            Ok(email) => email,
            Err(error) => panic!("fixture email: {error}"),
        };
        let user = NewUser {
            role,
            ..NewUser::with_defaults(username, email)
        };
        match MemoryUserRepository::new(self.store.clone()).create(&user).await {
            Ok(created) => created,
            Err(error) => panic!("seeding user failed: {error}"),
        }
    }

    /// Insert a category or genre whose name is its slug.
    pub async fn seed_entry(&self, kind: CatalogueKind, slug: &str) -> CatalogueEntry {
        let entry = match CatalogueEntry::try_from_parts(slug, slug) {
            Ok(entry) => entry,
            Err(error) => panic!("fixture entry: {error}"),
        };
        match MemoryCatalogueRepository::new(self.store.clone())
            .create(kind, &entry)
            .await
        {
            Ok(created) => created,
            Err(error) => panic!("seeding {} failed: {error}", kind.noun()),
        }
    }

    /// Insert a title; the category and genres must already exist.
    pub async fn seed_title(&self, name: &str, year: i32, category: &str, genres: &[&str]) -> Title {
        let slug = |raw: &str| match Slug::new(raw) {
            Ok(slug) => slug,
            Err(error) => panic!("fixture slug: {error}"),
        };
        let draft = TitleDraft {
            name: name.to_owned(),
            year,
            description: None,
            category: slug(category),
            genres: genres.iter().map(|genre| slug(genre)).collect(),
        };
        match MemoryTitleRepository::new(self.store.clone())
            .create(&draft)
            .await
        {
            Ok(title) => title,
            Err(error) => panic!("seeding title failed: {error}"),
        }
    }

    /// Insert a review by `author` at the harness clock's current time.
    pub async fn seed_review(&self, title: &Title, author: &User, score: i64) -> Review {
        let score = match Score::new(score) {
            Ok(score) => score,
            Err(error) => panic!("fixture score: {error}"),
        };
        let review = NewReview {
            title_id: title.id,
            author: author.id,
            text: format!("{} on {}", author.username, title.name),
            score,
            pub_date: self.clock.utc(),
        };
        match MemoryReviewRepository::new(self.store.clone())
            .create(&review)
            .await
        {
            Ok(created) => created,
            Err(error) => panic!("seeding review failed: {error}"),
        }
    }

    /// Bearer token for `user` at the harness clock's current time.
    pub fn token_for(&self, user: &User) -> String {
        match self.tokens.issue(user, self.clock.utc()) {
            Ok(token) => token.into(),
            Err(error) => panic!("issuing token failed: {error}"),
        }
    }

    /// `Authorization` header value for `user`.
    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", self.token_for(user))
    }
}
