//! # lb-db
//!
//! Database layer for LightBnB RS.
//!
//! This crate provides PostgreSQL database access using SQLx, including:
//!
//! - Connection pool management
//! - Filtered property search and property insertion
//! - User lookup and registration
//! - Reservation listing for a guest
//!
//! The expected schema uses `BIGSERIAL` ids for `users`, `properties`,
//! `reservations` and `property_reviews`, stores `properties.cost_per_night`
//! as an `INTEGER` number of cents, and `property_reviews.rating` as a
//! `SMALLINT` between 1 and 5.
//!
//! ## Example
//!
//! ```ignore
//! use lb_core::config::AppConfig;
//! use lb_db::{Database, DatabaseConfig, PropertyRepository};
//! use lb_queries::SearchCriteria;
//!
//! let settings = AppConfig::from_env()?;
//! let db = Database::connect(&DatabaseConfig::from_settings(&settings.database)).await?;
//!
//! let repo = PropertyRepository::postgres(db.pool().clone());
//! let rows = repo.search(&SearchCriteria::new().city("Vancouver"), 10).await?;
//! ```

pub mod pool;
pub mod repository;
pub mod store;
pub mod properties;
pub mod users;
pub mod reservations;

// Re-exports
pub use pool::{Database, DatabaseConfig, PoolStats};
pub use repository::{RepositoryError, RepositoryResult};
pub use store::{PgStore, StoreClient};
pub use properties::{NewProperty, PropertyRepository, PropertyRow};
pub use users::{NewUser, UserRepository, UserRow};
pub use reservations::{ReservationRepository, ReservationRow, DEFAULT_RESERVATION_LIMIT};
