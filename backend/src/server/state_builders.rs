//! Adapter selection for the HTTP state.
//!
//! A configured database pool selects the Diesel repositories; otherwise every
//! repository shares one in-memory store. A configured SMTP host selects the
//! relay mailer; otherwise confirmation mail is written to the log.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::warn;

use yamdb::domain::ConfirmationCodeSigner;
use yamdb::domain::ports::{
    CatalogueRepository, CommentRepository, PendingConfirmationRepository,
    ReviewRepository, TitleRepository, UserRepository,
};
use yamdb::inbound::http::state::{HttpState, HttpStateAdapters};
use yamdb::outbound::mail::mailer_from_settings;
use yamdb::outbound::memory::{
    MemoryCatalogueRepository, MemoryCommentRepository, MemoryPendingConfirmationRepository,
    MemoryReviewRepository, MemoryStore, MemoryTitleRepository, MemoryUserRepository,
};
use yamdb::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselCommentRepository,
    DieselPendingConfirmationRepository, DieselReviewRepository, DieselTitleRepository,
    DieselUserRepository,
};
use yamdb::outbound::tokens::JwtAccessTokenIssuer;
use yamdb::settings::AppSettings;

use super::ServerConfig;

/// Repository adapters without the mail, token and clock concerns.
struct Repositories {
    users: Arc<dyn UserRepository>,
    pending: Arc<dyn PendingConfirmationRepository>,
    catalogue: Arc<dyn CatalogueRepository>,
    titles: Arc<dyn TitleRepository>,
    reviews: Arc<dyn ReviewRepository>,
    comments: Arc<dyn CommentRepository>,
}

fn diesel_repositories(pool: &DbPool) -> Repositories {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        pending: Arc::new(DieselPendingConfirmationRepository::new(pool.clone())),
        catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
        titles: Arc::new(DieselTitleRepository::new(pool.clone())),
        reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
    }
}

fn memory_repositories() -> Repositories {
    let store = MemoryStore::new();
    Repositories {
        users: Arc::new(MemoryUserRepository::new(store.clone())),
        pending: Arc::new(MemoryPendingConfirmationRepository::new(store.clone())),
        catalogue: Arc::new(MemoryCatalogueRepository::new(store.clone())),
        titles: Arc::new(MemoryTitleRepository::new(store.clone())),
        reviews: Arc::new(MemoryReviewRepository::new(store.clone())),
        comments: Arc::new(MemoryCommentRepository::new(store)),
    }
}

/// Build the shared HTTP state from server configuration.
///
/// # Errors
/// Returns [`std::io::Error`] when the SMTP relay cannot be configured or the
/// signing key is rejected.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let repositories = match &config.db_pool {
        Some(pool) => diesel_repositories(pool),
        None => {
            warn!("no database configured; using in-memory storage");
            memory_repositories()
        }
    };
    let signer = ConfirmationCodeSigner::new(&config.token_key.key)
        .map_err(|err| std::io::Error::other(format!("token key rejected: {err}")))?;
    let tokens = JwtAccessTokenIssuer::new(&config.token_key.key, config.settings.token_ttl());
    let Repositories {
        users,
        pending,
        catalogue,
        titles,
        reviews,
        comments,
    } = repositories;

    Ok(HttpState::from_adapters(HttpStateAdapters {
        users,
        pending,
        catalogue,
        titles,
        reviews,
        comments,
        mailer: mailer_from_settings(&config.settings)
            .map_err(|err| std::io::Error::other(format!("SMTP configuration failed: {err}")))?,
        tokens: Arc::new(tokens),
        signer: Arc::new(signer),
        clock: Arc::new(DefaultClock),
    }))
}
