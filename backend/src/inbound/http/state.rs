//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccessTokenIssuer, AccountService, CatalogueRepository, CatalogueService, CommentRepository,
    CommentService, EmailSender, PendingConfirmationRepository, ReviewRepository, ReviewService,
    TitleRepository, TitleService, UserRepository, UserService,
};
use crate::domain::{
    AccountServiceDeps, ConfirmationCodeSigner, DomainAccountService, DomainCatalogueService,
    DomainCommentService, DomainReviewService, DomainTitleService, DomainUserService,
};

/// Parameter object bundling the driven adapters the services run on.
#[derive(Clone)]
pub struct HttpStateAdapters {
    pub users: Arc<dyn UserRepository>,
    pub pending: Arc<dyn PendingConfirmationRepository>,
    pub catalogue: Arc<dyn CatalogueRepository>,
    pub titles: Arc<dyn TitleRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub mailer: Arc<dyn EmailSender>,
    pub tokens: Arc<dyn AccessTokenIssuer>,
    pub signer: Arc<ConfirmationCodeSigner>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub users: Arc<dyn UserService>,
    pub catalogue: Arc<dyn CatalogueService>,
    pub titles: Arc<dyn TitleService>,
    pub reviews: Arc<dyn ReviewService>,
    pub comments: Arc<dyn CommentService>,
}

impl HttpState {
    /// Build the domain services over a set of adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use yamdb::domain::ConfirmationCodeSigner;
    /// use yamdb::inbound::http::state::{HttpState, HttpStateAdapters};
    /// use yamdb::outbound::mail::LoggingEmailSender;
    /// use yamdb::outbound::memory::{
    ///     MemoryCatalogueRepository, MemoryCommentRepository, MemoryPendingConfirmationRepository,
    ///     MemoryReviewRepository, MemoryStore, MemoryTitleRepository, MemoryUserRepository,
    /// };
    /// use yamdb::outbound::tokens::JwtAccessTokenIssuer;
    /// use zeroize::Zeroizing;
    ///
    /// let key = Zeroizing::new(vec![7_u8; 32]);
    /// let store = MemoryStore::new();
    /// let state = HttpState::from_adapters(HttpStateAdapters {
    ///     users: Arc::new(MemoryUserRepository::new(store.clone())),
    ///     pending: Arc::new(MemoryPendingConfirmationRepository::new(store.clone())),
    ///     catalogue: Arc::new(MemoryCatalogueRepository::new(store.clone())),
    ///     titles: Arc::new(MemoryTitleRepository::new(store.clone())),
    ///     reviews: Arc::new(MemoryReviewRepository::new(store.clone())),
    ///     comments: Arc::new(MemoryCommentRepository::new(store)),
    ///     mailer: Arc::new(LoggingEmailSender::new("noreply@yamdb.local")),
    ///     tokens: Arc::new(JwtAccessTokenIssuer::new(&key, chrono::Duration::days(1))),
    ///     signer: Arc::new(ConfirmationCodeSigner::new(&key).unwrap()),
    ///     clock: Arc::new(DefaultClock),
    /// });
    /// let _titles = state.titles.clone();
    /// ```
    pub fn from_adapters(adapters: HttpStateAdapters) -> Self {
        let HttpStateAdapters {
            users,
            pending,
            catalogue,
            titles,
            reviews,
            comments,
            mailer,
            tokens,
            signer,
            clock,
        } = adapters;
        let accounts = DomainAccountService::new(AccountServiceDeps {
            users: users.clone(),
            pending,
            mailer,
            tokens,
            signer,
            clock: clock.clone(),
        });
        Self {
            accounts: Arc::new(accounts),
            users: Arc::new(DomainUserService::new(users)),
            catalogue: Arc::new(DomainCatalogueService::new(catalogue)),
            titles: Arc::new(DomainTitleService::new(titles.clone(), clock.clone())),
            reviews: Arc::new(DomainReviewService::new(
                titles,
                reviews.clone(),
                clock.clone(),
            )),
            comments: Arc::new(DomainCommentService::new(reviews, comments, clock)),
        }
    }
}
