use crate::domain::link::Link;
use crate::error::Result;
use crate::storage::records::LinkRecord;
use sqlx::PgPool;

#[derive(Debug, Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, url: &str, title: &str, description: &str) -> Result<Link> {
        let link = sqlx::query_as::<_, LinkRecord>(
            r#"
            INSERT INTO links (url, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, url, title, description, created_at, updated_at
            "#,
        )
        .bind(url)
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(link.into())
    }

    pub async fn list(&self) -> Result<Vec<Link>> {
        let links = sqlx::query_as::<_, LinkRecord>(
            "SELECT id, url, title, description, created_at, updated_at FROM links ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(links.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, LinkRecord>(
            "SELECT id, url, title, description, created_at, updated_at FROM links WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link.map(Into::into))
    }

    /// Partial update; omitted fields keep their current value.
    pub async fn update(
        &self,
        id: i64,
        url: Option<&str>,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, LinkRecord>(
            r#"
            UPDATE links
            SET url = COALESCE($2, url),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                updated_at = now()
            WHERE id = $1
            RETURNING id, url, title, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(url)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link.map(Into::into))
    }

    pub async fn delete(&self, id: i64) -> Result<Option<Link>> {
        let link = sqlx::query_as::<_, LinkRecord>(
            "DELETE FROM links WHERE id = $1 RETURNING id, url, title, description, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link.map(Into::into))
    }
}
