use crate::domain::link::Link;
use crate::error::{AppError, Result};
use crate::storage::link_repo::LinkRepository;

#[derive(Debug, Clone)]
pub struct LinkService {
    repo: LinkRepository,
}

impl LinkService {
    #[must_use]
    pub const fn new(repo: LinkRepository) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn create(&self, url: String, title: String, description: Option<String>) -> Result<Link> {
        self.repo.create(&url, &title, description.as_deref().unwrap_or("")).await
    }

    pub async fn list(&self) -> Result<Vec<Link>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Link> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    #[tracing::instrument(skip(self, url, title, description), err(level = "warn"))]
    pub async fn update(
        &self,
        id: i64,
        url: Option<String>,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Link> {
        self.repo
            .update(id, url.as_deref(), title.as_deref(), description.as_deref())
            .await?
            .ok_or(AppError::NotFound)
    }

    #[tracing::instrument(skip(self), err(level = "warn"))]
    pub async fn delete(&self, id: i64) -> Result<Link> {
        self.repo.delete(id).await?.ok_or(AppError::NotFound)
    }
}
