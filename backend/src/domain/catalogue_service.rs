//! Category and genre management.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{CatalogueRepository, CatalogueService};
use crate::domain::{Access, Actor, CatalogueEntry, CatalogueKind, Error, Policy, Slug, Subject};

/// Catalogue service implementing the [`CatalogueService`] driving port.
#[derive(Clone)]
pub struct DomainCatalogueService {
    entries: Arc<dyn CatalogueRepository>,
}

impl DomainCatalogueService {
    /// Create a service backed by `entries`.
    pub fn new(entries: Arc<dyn CatalogueRepository>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl CatalogueService for DomainCatalogueService {
    async fn list(
        &self,
        actor: &Actor,
        kind: CatalogueKind,
        search: Option<String>,
        page: PageRequest,
    ) -> Result<Page<CatalogueEntry>, Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Read, Subject::Collection)?;
        Ok(self.entries.list(kind, search, page).await?)
    }

    async fn create(
        &self,
        actor: &Actor,
        kind: CatalogueKind,
        entry: CatalogueEntry,
    ) -> Result<CatalogueEntry, Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Create, Subject::Collection)?;
        let created = self.entries.create(kind, &entry).await?;
        info!(kind = kind.noun(), slug = %created.slug, "catalogue entry created");
        Ok(created)
    }

    async fn delete(&self, actor: &Actor, kind: CatalogueKind, slug: &Slug) -> Result<(), Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Delete, Subject::Collection)?;
        if self.entries.delete(kind, slug).await? {
            info!(kind = kind.noun(), %slug, "catalogue entry deleted");
            Ok(())
        } else {
            Err(Error::not_found(format!("{} `{slug}` not found", kind.noun())))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{CatalogueRepositoryError, MockCatalogueRepository};
    use crate::domain::{ErrorCode, Role};
    use crate::test_support::sample_user;
    use rstest::rstest;

    fn admin() -> Actor {
        Actor::Authenticated(sample_user(1, Role::Admin))
    }

    fn rock() -> CatalogueEntry {
        CatalogueEntry::try_from_parts("Rock", "rock").expect("valid entry")
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_callers_may_list() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_list()
            .withf(|kind, search, _| *kind == CatalogueKind::Genre && search.as_deref() == Some("ro"))
            .returning(|_, _, _| Ok(Page::new(vec![rock()], 1)));
        let page = DomainCatalogueService::new(Arc::new(repo))
            .list(
                &Actor::Anonymous,
                CatalogueKind::Genre,
                Some("ro".to_owned()),
                PageRequest::first(),
            )
            .await
            .expect("listed");
        assert_eq!(page.total(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn regular_users_cannot_create() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_create().never();
        let err = DomainCatalogueService::new(Arc::new(repo))
            .create(
                &Actor::Authenticated(sample_user(2, Role::User)),
                CatalogueKind::Category,
                rock(),
            )
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_slug_is_a_validation_error() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_create()
            .returning(|_, entry| Err(CatalogueRepositoryError::duplicate_slug(entry.slug.to_string())));
        let err = DomainCatalogueService::new(Arc::new(repo))
            .create(&admin(), CatalogueKind::Category, rock())
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(true, None)]
    #[case(false, Some(ErrorCode::NotFound))]
    #[tokio::test]
    async fn delete_reports_missing_slugs(#[case] removed: bool, #[case] expected: Option<ErrorCode>) {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_delete().returning(move |_, _| Ok(removed));
        let result = DomainCatalogueService::new(Arc::new(repo))
            .delete(&admin(), CatalogueKind::Genre, &Slug::new("rock").expect("slug"))
            .await;
        assert_eq!(result.err().map(|err| err.code()), expected);
    }
}
