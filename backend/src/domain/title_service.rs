//! Title catalogue use-cases.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::ports::{TitleRepository, TitleService};
use crate::domain::{
    Access, Actor, Error, Policy, Subject, Title, TitleChanges, TitleDraft, TitleFilter, TitleId,
    TitleInput,
};

/// Title service implementing the [`TitleService`] driving port.
#[derive(Clone)]
pub struct DomainTitleService {
    titles: Arc<dyn TitleRepository>,
    clock: Arc<dyn Clock>,
}

impl DomainTitleService {
    /// Create a service; `clock` supplies the current year for validation.
    pub fn new(titles: Arc<dyn TitleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { titles, clock }
    }

    fn current_year(&self) -> i32 {
        self.clock.utc().year()
    }
}

fn title_not_found(id: TitleId) -> Error {
    Error::not_found(format!("title {id} not found"))
}

#[async_trait]
impl TitleService for DomainTitleService {
    async fn list(
        &self,
        actor: &Actor,
        filter: TitleFilter,
        page: PageRequest,
    ) -> Result<Page<Title>, Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Read, Subject::Collection)?;
        Ok(self.titles.list(&filter, page).await?)
    }

    async fn create(&self, actor: &Actor, input: TitleInput) -> Result<Title, Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Create, Subject::Collection)?;
        let draft = TitleDraft::from_input(input, self.current_year())?;
        let title = self.titles.create(&draft).await?;
        info!(title_id = %title.id, "title created");
        Ok(title)
    }

    async fn get(&self, actor: &Actor, id: TitleId) -> Result<Title, Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Read, Subject::Collection)?;
        self.titles
            .find(id)
            .await?
            .ok_or_else(|| title_not_found(id))
    }

    async fn update(&self, actor: &Actor, id: TitleId, input: TitleInput) -> Result<Title, Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Update, Subject::Collection)?;
        let changes = TitleChanges::from_input(input, self.current_year())?;
        Ok(self.titles.update(id, &changes).await?)
    }

    async fn delete(&self, actor: &Actor, id: TitleId) -> Result<(), Error> {
        Policy::AdminWritePublicRead.authorize(actor, Access::Delete, Subject::Collection)?;
        if self.titles.delete(id).await? {
            info!(title_id = %id, "title deleted");
            Ok(())
        } else {
            Err(title_not_found(id))
        }
    }
}
