//! User repository
//!
//! Database operations for users.

use lb_core::Id;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::repository::RepositoryResult;
use crate::store::{PgStore, StoreClient};

/// User database entity
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct UserRow {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// DTO for creating a user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    /// Password hash to store
    #[validate(length(min = 1))]
    pub password: String,
}

/// Emails are stored and compared lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User repository implementation
pub struct UserRepository<S = PgStore> {
    store: S,
}

impl UserRepository<PgStore> {
    /// Repository backed by the PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(PgStore::new(pool))
    }
}

impl<S: StoreClient> UserRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Find a user by email, compared case-insensitively
    pub async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<UserRow>> {
        self.store
            .fetch_user_by_email(&normalize_email(email))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "User lookup by email failed");
                e
            })
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Id) -> RepositoryResult<Option<UserRow>> {
        self.store.fetch_user_by_id(id).await.map_err(|e| {
            tracing::error!(error = %e, user_id = id, "User lookup by id failed");
            e
        })
    }

    /// Add a new user
    pub async fn create(&self, dto: NewUser) -> RepositoryResult<UserRow> {
        dto.validate()?;

        let dto = NewUser {
            email: normalize_email(&dto.email),
            ..dto
        };

        let row = self.store.insert_user(&dto).await.map_err(|e| {
            tracing::error!(error = %e, "User insert failed");
            e
        })?;

        tracing::info!(user_id = row.id, "User created");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use crate::store::MockStoreClient;

    fn dto() -> NewUser {
        NewUser {
            name: "Devin Sanders".to_string(),
            email: "Devin@Example.com".to_string(),
            password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
        }
    }

    fn row(id: Id, email: &str) -> UserRow {
        UserRow {
            id,
            name: "Devin Sanders".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("Devin@Example.com"), "devin@example.com");
        assert_eq!(normalize_email("  a@b.io "), "a@b.io");
    }

    #[test]
    fn test_new_user_validation() {
        assert!(dto().validate().is_ok());

        let mut blank = dto();
        blank.name = String::new();
        assert!(blank.validate().is_err());

        let mut no_password = dto();
        no_password.password = String::new();
        assert!(no_password.validate().is_err());
    }

    #[test]
    fn test_malformed_emails_are_rejected() {
        for email in ["devin", "@", "a@", "@@@", "not an email@", "not an email@example.com"] {
            let mut user = dto();
            user.email = email.to_string();
            assert!(user.validate().is_err(), "{:?} should be rejected", email);
        }
    }

    #[tokio::test]
    async fn test_find_by_email_lowercases_lookup() {
        let mut store = MockStoreClient::new();
        store
            .expect_fetch_user_by_email()
            .withf(|email| email == "devin@example.com")
            .times(1)
            .returning(|email| Ok(Some(row(7, email))));

        let repo = UserRepository::new(store);
        let user = repo.find_by_email("  Devin@Example.COM").await.unwrap().unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.email, "devin@example.com");
    }

    #[tokio::test]
    async fn test_find_by_email_absent_is_none() {
        let mut store = MockStoreClient::new();
        store
            .expect_fetch_user_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let repo = UserRepository::new(store);
        assert_eq!(repo.find_by_email("nobody@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by_id_propagates_store_failure() {
        let mut store = MockStoreClient::new();
        store
            .expect_fetch_user_by_id()
            .times(1)
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));

        let repo = UserRepository::new(store);
        assert!(matches!(
            repo.find_by_id(1).await,
            Err(RepositoryError::Database(_))
        ));
    }

    #[tokio::test]
    async fn test_create_stores_lowercased_email() {
        let mut store = MockStoreClient::new();
        store
            .expect_insert_user()
            .withf(|u| u.email == "devin@example.com" && u.name == "Devin Sanders")
            .times(1)
            .returning(|u| Ok(row(12, &u.email)));

        let repo = UserRepository::new(store);
        let user = repo.create(dto()).await.unwrap();
        assert_eq!(user.id, 12);
    }

    #[tokio::test]
    async fn test_create_surfaces_duplicate_email_as_conflict() {
        let mut store = MockStoreClient::new();
        store
            .expect_insert_user()
            .times(1)
            .returning(|_| Err(RepositoryError::Conflict("user with this email already exists".into())));

        let repo = UserRepository::new(store);
        assert!(matches!(
            repo.create(dto()).await,
            Err(RepositoryError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email_before_insert() {
        let mut store = MockStoreClient::new();
        store.expect_insert_user().never();

        let mut user = dto();
        user.email = "a@".to_string();

        let repo = UserRepository::new(store);
        assert!(matches!(
            repo.create(user).await,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn test_password_is_not_serialized() {
        let row = UserRow {
            id: 1,
            name: "Devin".to_string(),
            email: "devin@example.com".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "devin@example.com");
    }
}
