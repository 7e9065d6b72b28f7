use crate::domain::link::Link;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLink {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateLink {
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("url must not be empty".to_string());
        }
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLink {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBody {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Link> for LinkBody {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            url: link.url,
            title: link.title,
            description: link.description,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_link_validation() {
        let ok = CreateLink {
            url: "https://example.com".to_string(),
            title: "Example".to_string(),
            description: None,
        };
        assert!(ok.validate().is_ok());

        let no_url = CreateLink { url: "  ".to_string(), title: "Example".to_string(), description: None };
        assert!(no_url.validate().is_err());

        let no_title = CreateLink {
            url: "https://example.com".to_string(),
            title: String::new(),
            description: None,
        };
        assert!(no_title.validate().is_err());
    }
}
