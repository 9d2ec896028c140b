//! Property repository
//!
//! Filtered property search and property insertion.

use lb_core::Id;
use lb_queries::{PropertySearchQuery, SearchCriteria, DEFAULT_SEARCH_LIMIT};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use validator::Validate;

use crate::repository::RepositoryResult;
use crate::store::{PgStore, StoreClient};

/// Property row with the average rating of its reviews
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct PropertyRow {
    pub id: Id,
    pub owner_id: Id,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Cost per night in cents
    pub cost_per_night: i32,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
    /// `None` when the property has no reviews
    pub average_rating: Option<f64>,
}

/// DTO for creating a property
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewProperty {
    pub owner_id: Id,
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    /// Cost per night in cents
    #[validate(range(min = 0))]
    pub cost_per_night: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub parking_spaces: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub number_of_bathrooms: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Property repository implementation
pub struct PropertyRepository<S = PgStore> {
    store: S,
}

impl PropertyRepository<PgStore> {
    /// Repository backed by the PostgreSQL pool
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(PgStore::new(pool))
    }
}

impl<S: StoreClient> PropertyRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Search properties matching `criteria`, cheapest first, at most `limit` rows.
    ///
    /// Criteria are validated before the store is contacted. Store failures are
    /// returned to the caller rather than reported as an empty result.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        limit: i64,
    ) -> RepositoryResult<Vec<PropertyRow>> {
        let query = PropertySearchQuery::build(criteria, limit)?;

        tracing::debug!(
            sql = %query.sql,
            params = query.params.len(),
            unfiltered = criteria.is_empty(),
            "Searching properties"
        );

        match self.store.fetch_properties(&query).await {
            Ok(rows) => {
                tracing::debug!(rows = rows.len(), "Property search finished");
                Ok(rows)
            }
            Err(e) => {
                tracing::error!(error = %e, "Property search failed");
                Err(e)
            }
        }
    }

    /// Search with the default limit
    pub async fn search_default(&self, criteria: &SearchCriteria) -> RepositoryResult<Vec<PropertyRow>> {
        self.search(criteria, DEFAULT_SEARCH_LIMIT).await
    }

    /// Create a new property
    pub async fn create(&self, property: NewProperty) -> RepositoryResult<PropertyRow> {
        property.validate()?;

        let row = self.store.insert_property(&property).await.map_err(|e| {
            tracing::error!(error = %e, owner_id = property.owner_id, "Property insert failed");
            e
        })?;

        tracing::info!(id = row.id, owner_id = row.owner_id, "Property created");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;
    use crate::store::MockStoreClient;
    use lb_queries::SqlParam;

    fn property(id: Id, city: &str, cost: i32, rating: Option<f64>) -> PropertyRow {
        PropertyRow {
            id,
            owner_id: 1,
            title: format!("Listing {}", id),
            description: None,
            thumbnail_photo_url: "https://img.example.com/t.jpg".to_string(),
            cover_photo_url: "https://img.example.com/c.jpg".to_string(),
            cost_per_night: cost,
            parking_spaces: 1,
            number_of_bathrooms: 1,
            number_of_bedrooms: 2,
            country: "Italy".to_string(),
            street: "Via Roma 1".to_string(),
            city: city.to_string(),
            province: "Lazio".to_string(),
            post_code: "00100".to_string(),
            active: true,
            average_rating: rating,
        }
    }

    fn new_property() -> NewProperty {
        NewProperty {
            owner_id: 4,
            title: "Loft".to_string(),
            description: Some("Sunny".to_string()),
            thumbnail_photo_url: "t".to_string(),
            cover_photo_url: "c".to_string(),
            cost_per_night: 12000,
            parking_spaces: 0,
            number_of_bathrooms: 1,
            number_of_bedrooms: 1,
            country: "Canada".to_string(),
            street: "1 Main St".to_string(),
            city: "Vancouver".to_string(),
            province: "BC".to_string(),
            post_code: "V5K".to_string(),
            active: true,
        }
    }

    #[tokio::test]
    async fn test_search_returns_store_rows() {
        let rows = vec![property(1, "Rome", 9000, Some(4.5)), property(2, "Rome", 12000, None)];
        let expected = rows.clone();

        let mut store = MockStoreClient::new();
        store
            .expect_fetch_properties()
            .withf(|q| {
                q.params == vec![SqlParam::text("%Rome%"), SqlParam::Int(5)]
                    && q.sql.contains("WHERE city LIKE $1")
            })
            .times(1)
            .returning(move |_| Ok(rows.clone()));

        let repo = PropertyRepository::new(store);
        let found = repo.search(&SearchCriteria::new().city("Rome"), 5).await.unwrap();

        assert_eq!(found, expected);
        assert_eq!(found[0].average_rating, Some(4.5));
        assert_eq!(found[1].average_rating, None);
    }

    #[tokio::test]
    async fn test_search_default_limit() {
        let mut store = MockStoreClient::new();
        store
            .expect_fetch_properties()
            .withf(|q| q.params == vec![SqlParam::Int(DEFAULT_SEARCH_LIMIT)])
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let repo = PropertyRepository::new(store);
        let found = repo.search_default(&SearchCriteria::new()).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_search_propagates_store_failure() {
        let mut store = MockStoreClient::new();
        store
            .expect_fetch_properties()
            .times(1)
            .returning(|_| Err(RepositoryError::Database(sqlx::Error::PoolTimedOut)));

        let repo = PropertyRepository::new(store);
        let result = repo.search(&SearchCriteria::new().city("Rome"), 5).await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_invalid_criteria_never_reach_store() {
        let mut store = MockStoreClient::new();
        store.expect_fetch_properties().never();

        let repo = PropertyRepository::new(store);

        let inverted = SearchCriteria::new().price_between(150.0, 50.0);
        assert!(matches!(
            repo.search(&inverted, 10).await,
            Err(RepositoryError::InvalidCriteria(_))
        ));

        assert!(matches!(
            repo.search(&SearchCriteria::new(), 0).await,
            Err(RepositoryError::InvalidCriteria(_))
        ));
    }

    #[tokio::test]
    async fn test_create_returns_stored_row() {
        let mut store = MockStoreClient::new();
        store
            .expect_insert_property()
            .withf(|p| p.title == "Loft" && p.cost_per_night == 12000)
            .times(1)
            .returning(|p| {
                let mut row = property(41, &p.city, p.cost_per_night, None);
                row.owner_id = p.owner_id;
                row.title = p.title.clone();
                Ok(row)
            });

        let repo = PropertyRepository::new(store);
        let row = repo.create(new_property()).await.unwrap();

        assert_eq!(row.id, 41);
        assert_eq!(row.owner_id, 4);
        assert_eq!(row.city, "Vancouver");
        assert_eq!(row.average_rating, None);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let mut store = MockStoreClient::new();
        store.expect_insert_property().never();

        let mut dto = new_property();
        dto.title = String::new();

        let repo = PropertyRepository::new(store);
        assert!(matches!(
            repo.create(dto).await,
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn test_new_property_validation() {
        let mut dto = new_property();
        assert!(dto.validate().is_ok());

        dto.cost_per_night = -1;
        assert!(dto.validate().is_err());

        let mut dto = new_property();
        dto.number_of_bedrooms = -2;
        assert!(dto.validate().is_err());

        let mut dto = new_property();
        dto.parking_spaces = -1;
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("parking_spaces"));
    }

    #[tokio::test]
    async fn test_create_reports_negative_cost_as_validation_error() {
        let mut store = MockStoreClient::new();
        store.expect_insert_property().never();

        let mut dto = new_property();
        dto.cost_per_night = -100;

        let repo = PropertyRepository::new(store);
        match repo.create(dto).await {
            Err(RepositoryError::Validation(message)) => assert!(message.contains("cost_per_night")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_new_property_from_json_defaults() {
        let dto: NewProperty = serde_json::from_str(
            r#"{
                "owner_id": 1, "title": "Cabin", "thumbnail_photo_url": "t",
                "cover_photo_url": "c", "cost_per_night": 9900, "country": "Canada",
                "street": "2 Lake Rd", "city": "Whistler", "province": "BC", "post_code": "V0N"
            }"#,
        )
        .unwrap();

        assert!(dto.active);
        assert_eq!(dto.parking_spaces, 0);
        assert_eq!(dto.description, None);
    }
}
