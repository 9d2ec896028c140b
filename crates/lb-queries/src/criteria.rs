//! Property search criteria
//!
//! Criteria are the optional filters a caller supplies to narrow a property
//! search. Every field is independent; an unset field contributes nothing to
//! the generated query.

use lb_core::Id;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest rating a guest can leave on a property
pub const MAX_RATING: f64 = 5.0;

/// Highest price per night, in dollars, whose cent amount fits the
/// `INTEGER` `cost_per_night` column
pub const MAX_PRICE_PER_NIGHT: f64 = i32::MAX as f64 / 100.0;

/// Errors raised when criteria cannot be turned into a query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriteriaError {
    #[error("{field} must be a finite number, got {value}")]
    InvalidPrice { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    NegativePrice { field: &'static str, value: f64 },

    #[error("{field} must not exceed {max}, got {value}", max = MAX_PRICE_PER_NIGHT)]
    PriceTooLarge { field: &'static str, value: f64 },

    #[error("minimum price per night ({minimum}) exceeds maximum ({maximum})")]
    InvertedPriceRange { minimum: f64, maximum: f64 },

    #[error("minimum rating must be between 0 and 5, got {0}")]
    InvalidRating(f64),

    #[error("limit must be at least 1, got {0}")]
    InvalidLimit(i64),
}

/// Filters for a property search.
///
/// Prices are expressed in dollars; they are converted to cents when the
/// query is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub city: Option<String>,
    pub owner_id: Option<Id>,
    pub minimum_price_per_night: Option<f64>,
    pub maximum_price_per_night: Option<f64>,
    pub minimum_rating: Option<f64>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match properties whose city contains `city`
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Match properties owned by `owner_id`
    pub fn owner(mut self, owner_id: Id) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn minimum_price(mut self, dollars: f64) -> Self {
        self.minimum_price_per_night = Some(dollars);
        self
    }

    pub fn maximum_price(mut self, dollars: f64) -> Self {
        self.maximum_price_per_night = Some(dollars);
        self
    }

    /// Match properties whose price per night lies in `[minimum, maximum]` dollars
    pub fn price_between(self, minimum: f64, maximum: f64) -> Self {
        self.minimum_price(minimum).maximum_price(maximum)
    }

    /// Match properties whose average review rating is at least `rating`
    pub fn minimum_rating(mut self, rating: f64) -> Self {
        self.minimum_rating = Some(rating);
        self
    }

    /// The city filter, if set to a non-empty string
    pub fn city_filter(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| !c.is_empty())
    }

    /// Both price bounds, if both are set.
    ///
    /// A single bound on its own does not filter anything.
    pub fn price_range(&self) -> Option<(f64, f64)> {
        match (self.minimum_price_per_night, self.maximum_price_per_night) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }

    /// True when no filter would be applied
    pub fn is_empty(&self) -> bool {
        self.city_filter().is_none()
            && self.owner_id.is_none()
            && self.price_range().is_none()
            && self.minimum_rating.is_none()
    }

    /// Check every set field, including a lone price bound that would
    /// otherwise be ignored.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        for (field, value) in [
            ("minimum_price_per_night", self.minimum_price_per_night),
            ("maximum_price_per_night", self.maximum_price_per_night),
        ] {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(CriteriaError::InvalidPrice { field, value });
                }
                if value < 0.0 {
                    return Err(CriteriaError::NegativePrice { field, value });
                }
                if value > MAX_PRICE_PER_NIGHT {
                    return Err(CriteriaError::PriceTooLarge { field, value });
                }
            }
        }

        if let Some((minimum, maximum)) = self.price_range() {
            if minimum > maximum {
                return Err(CriteriaError::InvertedPriceRange { minimum, maximum });
            }
        }

        if let Some(rating) = self.minimum_rating {
            if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
                return Err(CriteriaError::InvalidRating(rating));
            }
        }

        Ok(())
    }
}
