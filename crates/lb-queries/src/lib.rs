//! # lb-queries
//!
//! Query layer for searching LightBnB properties.
//!
//! ## Structure
//!
//! - `criteria` - Optional filters supplied by the caller
//! - `params` - Bind values for positional placeholders
//! - `builder` - Turns criteria into parameterised SQL
//!
//! ## Example
//!
//! ```
//! use lb_queries::{PropertySearchQuery, SearchCriteria, SqlParam};
//!
//! let criteria = SearchCriteria::new().city("Vancouver").price_between(50.0, 150.0);
//! let query = PropertySearchQuery::build(&criteria, 10).unwrap();
//!
//! assert!(query.sql.contains("WHERE city LIKE $1 AND cost_per_night BETWEEN $2 AND $3"));
//! assert_eq!(query.params[1], SqlParam::Int(5000));
//! ```

pub mod criteria;
pub mod params;
pub mod builder;

// Re-exports for convenience
pub use criteria::{CriteriaError, SearchCriteria, MAX_PRICE_PER_NIGHT, MAX_RATING};
pub use params::SqlParam;
pub use builder::{PropertySearchBuilder, PropertySearchQuery, DEFAULT_SEARCH_LIMIT};
