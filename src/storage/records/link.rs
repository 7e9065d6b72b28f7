use crate::domain::link::Link;
use time::OffsetDateTime;

#[derive(sqlx::FromRow)]
pub(crate) struct LinkRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<LinkRecord> for Link {
    fn from(record: LinkRecord) -> Self {
        Self {
            id: record.id,
            url: record.url,
            title: record.title,
            description: record.description,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
