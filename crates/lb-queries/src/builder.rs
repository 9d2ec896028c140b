//! Property search query builder
//!
//! Collects WHERE and HAVING predicates together with their bind values and
//! renders the final SQL once. Every placeholder is handed out by
//! [`PropertySearchBuilder::push_param`], so `$N` always refers to the Nth
//! entry of the parameter list.

use lb_core::{dollars_to_cents, Id};

use crate::criteria::{CriteriaError, SearchCriteria};
use crate::params::{escape_like, SqlParam};

/// Number of rows returned when the caller does not pick a limit
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;

const BASE_SELECT: &str = "SELECT properties.*, AVG(property_reviews.rating)::float8 AS average_rating\n\
FROM properties\n\
LEFT JOIN property_reviews ON properties.id = property_reviews.property_id";

/// A rendered search: SQL text plus its bind values, in placeholder order
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySearchQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl PropertySearchQuery {
    /// Build the search for `criteria`, applying filters in the order
    /// city, owner, price range, minimum rating.
    pub fn build(criteria: &SearchCriteria, limit: i64) -> Result<Self, CriteriaError> {
        criteria.validate()?;
        if limit < 1 {
            return Err(CriteriaError::InvalidLimit(limit));
        }

        let mut builder = PropertySearchBuilder::new();

        if let Some(city) = criteria.city_filter() {
            builder = builder.city_contains(city);
        }
        if let Some(owner_id) = criteria.owner_id {
            builder = builder.owner(owner_id);
        }
        if let Some((minimum, maximum)) = criteria.price_range() {
            builder = builder.price_between_cents(dollars_to_cents(minimum), dollars_to_cents(maximum));
        }
        if let Some(rating) = criteria.minimum_rating {
            builder = builder.minimum_rating(rating);
        }

        Ok(builder.build(limit))
    }

    /// Number of `$N` placeholders in the rendered SQL
    pub fn placeholder_count(&self) -> usize {
        self.params.len()
    }
}

/// Builder for the filtered property search
#[derive(Debug, Default)]
pub struct PropertySearchBuilder {
    where_predicates: Vec<String>,
    having_predicates: Vec<String>,
    params: Vec<SqlParam>,
}

impl PropertySearchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bind value and return its 1-based placeholder index
    fn push_param(&mut self, param: impl Into<SqlParam>) -> usize {
        self.params.push(param.into());
        self.params.len()
    }

    /// Filter by city substring. An empty city adds nothing.
    ///
    /// `%`, `_` and `\` inside `city` are escaped, so they match literally
    /// instead of acting as wildcards. This is stricter than binding
    /// `%<city>%` unescaped, where `_` in a city matched any one character.
    pub fn city_contains(mut self, city: &str) -> Self {
        if city.is_empty() {
            return self;
        }
        let n = self.push_param(format!("%{}%", escape_like(city)));
        self.where_predicates.push(format!("city LIKE ${}", n));
        self
    }

    /// Filter by owner
    pub fn owner(mut self, owner_id: Id) -> Self {
        let n = self.push_param(owner_id);
        self.where_predicates.push(format!("owner_id = ${}", n));
        self
    }

    /// Filter by cost per night, both bounds inclusive and already in cents
    pub fn price_between_cents(mut self, minimum: i64, maximum: i64) -> Self {
        let lo = self.push_param(minimum);
        let hi = self.push_param(maximum);
        self.where_predicates
            .push(format!("cost_per_night BETWEEN ${} AND ${}", lo, hi));
        self
    }

    /// Filter on the aggregated average rating.
    ///
    /// The average only exists after grouping, so this always lands in HAVING.
    pub fn minimum_rating(mut self, rating: f64) -> Self {
        let n = self.push_param(rating);
        self.having_predicates
            .push(format!("AVG(property_reviews.rating) >= ${}", n));
        self
    }

    /// Render the SQL, binding `limit` as the final parameter
    pub fn build(mut self, limit: i64) -> PropertySearchQuery {
        let mut sql = String::from(BASE_SELECT);

        if !self.where_predicates.is_empty() {
            sql.push_str("\nWHERE ");
            sql.push_str(&self.where_predicates.join(" AND "));
        }

        sql.push_str("\nGROUP BY properties.id");

        if !self.having_predicates.is_empty() {
            sql.push_str("\nHAVING ");
            sql.push_str(&self.having_predicates.join(" AND "));
        }

        sql.push_str("\nORDER BY cost_per_night");

        let n = self.push_param(limit);
        sql.push_str(&format!("\nLIMIT ${}", n));

        PropertySearchQuery {
            sql,
            params: self.params,
        }
    }
}
