use crate::domain::auth::TokenPair;
use crate::domain::user::PublicUser;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const MIN_PASSWORD_LEN: usize = 6;

fn validate_email(email: &str) -> Result<(), String> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("Invalid email address".to_string()),
    }
}

fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
}

impl Registration {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

impl Login {
    pub fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refresh {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub email_verified_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PublicUser> for UserBody {
    fn from(user: PublicUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            email_verified_at: user.email_verified_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserBody,
}

impl AuthResponse {
    #[must_use]
    pub fn new(tokens: TokenPair, user: PublicUser) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            user: user.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
            remember_me: false,
        }
    }

    #[test]
    fn test_registration_validation_ok() {
        assert!(registration("user@example.com", "Secret123!").validate().is_ok());
    }

    #[test]
    fn test_registration_rejects_bad_email() {
        assert!(registration("not-an-email", "Secret123!").validate().is_err());
        assert!(registration("@example.com", "Secret123!").validate().is_err());
        assert!(registration("user@", "Secret123!").validate().is_err());
    }

    #[test]
    fn test_registration_rejects_short_password() {
        assert!(registration("user@example.com", "short").validate().is_err());
    }

    #[test]
    fn test_remember_me_defaults_to_false() {
        let payload: Login =
            serde_json::from_str(r#"{"email":"a@b.c","password":"Secret123!"}"#).unwrap();
        assert!(!payload.remember_me);
    }
}
