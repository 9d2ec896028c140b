//! Relational store client
//!
//! The repositories talk to the database through [`StoreClient`] so their
//! logic can run against a stand-in store in tests. Every SQL statement
//! lives here, in [`PgStore`].

use async_trait::async_trait;
use lb_core::Id;
use lb_queries::{PropertySearchQuery, SqlParam};
use sqlx::PgPool;

use crate::properties::{NewProperty, PropertyRow};
use crate::repository::{RepositoryError, RepositoryResult};
use crate::reservations::ReservationRow;
use crate::users::{NewUser, UserRow};

/// Reservations of one guest with the reserved property's average rating.
///
/// Reviews are left-joined so reservations of unreviewed properties are kept
/// with a `NULL` average.
pub(crate) const RESERVATIONS_FOR_GUEST_SQL: &str = r#"
    SELECT reservations.id, properties.title, properties.cost_per_night,
           reservations.start_date, reservations.end_date,
           AVG(property_reviews.rating)::float8 AS average_rating
    FROM reservations
    JOIN properties ON reservations.property_id = properties.id
    LEFT JOIN property_reviews ON properties.id = property_reviews.property_id
    WHERE reservations.guest_id = $1
    GROUP BY properties.id, reservations.id
    ORDER BY reservations.start_date DESC
    LIMIT $2
"#;

/// Executes statements against a relational store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Run a rendered search and return the matching rows
    async fn fetch_properties(&self, query: &PropertySearchQuery) -> RepositoryResult<Vec<PropertyRow>>;

    /// Insert a property and return the stored row
    async fn insert_property(&self, property: &NewProperty) -> RepositoryResult<PropertyRow>;

    /// Fetch the user with exactly this (already normalized) email
    async fn fetch_user_by_email(&self, email: &str) -> RepositoryResult<Option<UserRow>>;

    async fn fetch_user_by_id(&self, id: Id) -> RepositoryResult<Option<UserRow>>;

    /// Insert a user whose email is already normalized
    async fn insert_user(&self, user: &NewUser) -> RepositoryResult<UserRow>;

    async fn fetch_reservations(&self, guest_id: Id, limit: i64) -> RepositoryResult<Vec<ReservationRow>>;
}

/// PostgreSQL store backed by a connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoreClient for PgStore {
    async fn fetch_properties(&self, query: &PropertySearchQuery) -> RepositoryResult<Vec<PropertyRow>> {
        let mut statement = sqlx::query_as::<_, PropertyRow>(&query.sql);
        for param in &query.params {
            statement = match param {
                SqlParam::Int(v) => statement.bind(*v),
                SqlParam::Float(v) => statement.bind(*v),
                SqlParam::Text(v) => statement.bind(v.as_str()),
            };
        }

        let rows = statement.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert_property(&self, property: &NewProperty) -> RepositoryResult<PropertyRow> {
        let row = sqlx::query_as::<_, PropertyRow>(
            r#"
            INSERT INTO properties (
                owner_id, title, description, thumbnail_photo_url, cover_photo_url,
                cost_per_night, parking_spaces, number_of_bathrooms, number_of_bedrooms,
                country, street, city, province, post_code, active
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15
            )
            RETURNING *, NULL::float8 AS average_rating
            "#,
        )
        .bind(property.owner_id)
        .bind(&property.title)
        .bind(&property.description)
        .bind(&property.thumbnail_photo_url)
        .bind(&property.cover_photo_url)
        .bind(property.cost_per_night)
        .bind(property.parking_spaces)
        .bind(property.number_of_bathrooms)
        .bind(property.number_of_bedrooms)
        .bind(&property.country)
        .bind(&property.street)
        .bind(&property.city)
        .bind(&property.province)
        .bind(&property.post_code)
        .bind(property.active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "property"))?;

        Ok(row)
    }

    async fn fetch_user_by_email(&self, email: &str) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn fetch_user_by_id(&self, id: Id) -> RepositoryResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_user(&self, user: &NewUser) -> RepositoryResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "user with this email"))?;

        Ok(row)
    }

    async fn fetch_reservations(&self, guest_id: Id, limit: i64) -> RepositoryResult<Vec<ReservationRow>> {
        let rows = sqlx::query_as::<_, ReservationRow>(RESERVATIONS_FOR_GUEST_SQL)
            .bind(guest_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
