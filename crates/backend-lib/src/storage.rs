// ============================
// crates/backend-lib/src/storage.rs
// ============================
//! User persistence abstraction with flat-file implementation.
use crate::error::AppError;
use async_trait::async_trait;
use ledgerly_common::{Role, UserPublic};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokio::fs as tokio_fs;

/// A persisted user record. `refresh_token` mirrors the most recently
/// issued refresh token; `None` means the user is logged out.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub refresh_token: Option<String>,
}

impl UserRecord {
    /// Public view of the record, stripped of credentials.
    pub fn public(&self) -> UserPublic {
        UserPublic {
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Trait for user storage backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError>;

    /// Look up a user by email
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    /// Look up the user whose stored refresh token equals `token`
    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<UserRecord>, AppError>;

    /// Upsert a user record
    async fn save(&self, user: &UserRecord) -> Result<(), AppError>;

    /// List all user records
    async fn list(&self) -> Result<Vec<UserRecord>, AppError>;
}

/// Flat-file implementation of the `UserStore` trait.
/// One JSON document per user under `<root>/users/`.
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("users"))?;
        Ok(Self { root })
    }

    fn user_path(&self, username: &str) -> PathBuf {
        self.root.join("users").join(format!("{username}.json"))
    }

    async fn scan<F>(&self, pred: F) -> Result<Option<UserRecord>, AppError>
    where
        F: Fn(&UserRecord) -> bool,
    {
        for user in self.list().await? {
            if pred(&user) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl UserStore for FlatFileStorage {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, AppError> {
        let path = self.user_path(username);
        if !path.exists() {
            return Ok(None);
        }
        let content = tokio_fs::read_to_string(&path).await?;
        let user: UserRecord = serde_json::from_str(&content)?;
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        self.scan(|u| u.email == email).await
    }

    async fn find_by_refresh_token(&self, token: &str) -> Result<Option<UserRecord>, AppError> {
        self.scan(|u| u.refresh_token.as_deref() == Some(token))
            .await
    }

    async fn save(&self, user: &UserRecord) -> Result<(), AppError> {
        let path = self.user_path(&user.username);
        let json = serde_json::to_string_pretty(user)?;
        tokio_fs::write(path, json).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, AppError> {
        let dir = self.root.join("users");
        let mut users = Vec::new();
        let mut entries = tokio_fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = tokio_fs::read_to_string(entry.path()).await?;
            users.push(serde_json::from_str(&content)?);
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_user() -> UserRecord {
        UserRecord {
            id: "u-1".to_string(),
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Regular,
            refresh_token: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_find_by_username() {
        let dir = tempdir().unwrap();
        let store = FlatFileStorage::new(dir.path()).unwrap();

        assert!(store.find_by_username("maria").await.unwrap().is_none());

        let user = sample_user();
        store.save(&user).await.unwrap();

        let found = store.find_by_username("maria").await.unwrap().unwrap();
        assert_eq!(found, user);
    }

    #[tokio::test]
    async fn test_find_by_email_and_refresh_token() {
        let dir = tempdir().unwrap();
        let store = FlatFileStorage::new(dir.path()).unwrap();

        let mut user = sample_user();
        user.refresh_token = Some("tok-123".to_string());
        store.save(&user).await.unwrap();

        let by_email = store
            .find_by_email("maria@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.username, "maria");

        let by_token = store.find_by_refresh_token("tok-123").await.unwrap().unwrap();
        assert_eq!(by_token.username, "maria");

        assert!(store.find_by_refresh_token("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempdir().unwrap();
        let store = FlatFileStorage::new(dir.path()).unwrap();

        let mut user = sample_user();
        store.save(&user).await.unwrap();

        user.refresh_token = Some("fresh".to_string());
        store.save(&user).await.unwrap();

        let found = store.find_by_username("maria").await.unwrap().unwrap();
        assert_eq!(found.refresh_token.as_deref(), Some("fresh"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
