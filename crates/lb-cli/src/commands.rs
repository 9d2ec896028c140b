//! Subcommands and their execution against the database

use std::io::Read;

use clap::{Args, Subcommand};
use lb_core::{Id, LbError, LbResult};
use lb_db::{
    Database, NewProperty, NewUser, PropertyRepository, ReservationRepository, UserRepository,
    DEFAULT_RESERVATION_LIMIT,
};
use lb_queries::{SearchCriteria, DEFAULT_SEARCH_LIMIT};
use serde_json::{json, Value};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the database is reachable
    Ping,

    /// Search properties, cheapest first
    Search(SearchArgs),

    /// Look up a user by email or id
    User(UserArgs),

    /// Register a new user
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Password hash to store
        #[arg(long)]
        password: String,
    },

    /// List a guest's reservations, most recent first
    Reservations {
        #[arg(long)]
        guest_id: Id,
        #[arg(long, default_value_t = DEFAULT_RESERVATION_LIMIT)]
        limit: i64,
    },

    /// Insert a property read as JSON from stdin
    AddProperty,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Substring of the city name
    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub owner_id: Option<Id>,

    /// Minimum price per night in dollars (needs --max-price)
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price per night in dollars (needs --min-price)
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum average review rating
    #[arg(long)]
    pub min_rating: Option<f64>,

    #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
    pub limit: i64,
}

impl SearchArgs {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            city: self.city.clone(),
            owner_id: self.owner_id,
            minimum_price_per_night: self.min_price,
            maximum_price_per_night: self.max_price,
            minimum_rating: self.min_rating,
        }
    }
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct UserArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub id: Option<Id>,
}

fn to_json<T: serde::Serialize>(value: &T) -> LbResult<Value> {
    serde_json::to_value(value).map_err(|e| LbError::Internal(e.to_string()))
}

/// Run one command and return what should be printed
pub async fn run(command: Command, db: &Database) -> LbResult<Value> {
    let pool = db.pool().clone();

    match command {
        Command::Ping => {
            let now = db.ping().await.map_err(|e| LbError::Database(e.to_string()))?;
            Ok(json!({ "connected": true, "now": now, "pool": db.stats() }))
        }
        Command::Search(args) => {
            let repo = PropertyRepository::postgres(pool);
            let rows = repo.search(&args.criteria(), args.limit).await?;
            to_json(&rows)
        }
        Command::User(UserArgs { email, id }) => {
            let repo = UserRepository::postgres(pool);
            let user = match (email, id) {
                (Some(email), _) => repo
                    .find_by_email(&email)
                    .await?
                    .ok_or_else(|| LbError::not_found("user", "email", &email))?,
                (None, Some(id)) => repo
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| LbError::not_found("user", "id", id))?,
                (None, None) => {
                    return Err(LbError::Validation("either --email or --id is required".into()))
                }
            };
            to_json(&user)
        }
        Command::AddUser { name, email, password } => {
            let repo = UserRepository::postgres(pool);
            let user = repo.create(NewUser { name, email, password }).await?;
            to_json(&user)
        }
        Command::Reservations { guest_id, limit } => {
            let repo = ReservationRepository::postgres(pool);
            let rows = repo.list_for_guest(guest_id, limit).await?;
            to_json(&rows)
        }
        Command::AddProperty => {
            let property = read_property(std::io::stdin())?;
            let repo = PropertyRepository::postgres(pool);
            let row = repo.create(property).await?;
            to_json(&row)
        }
    }
}

fn read_property(mut input: impl Read) -> LbResult<NewProperty> {
    let mut buf = String::new();
    input
        .read_to_string(&mut buf)
        .map_err(|e| LbError::Internal(format!("failed to read stdin: {}", e)))?;
    serde_json::from_str(&buf).map_err(|e| LbError::Validation(format!("invalid property JSON: {}", e)))
}
