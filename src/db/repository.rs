//! Repository pattern implementation for data access layer
//!
//! Each method maps to exactly one SQL statement.

use crate::core::error::Result;
use crate::db::manager::DatabaseManager;
use crate::db::models::{NewRestaurant, Restaurant};
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

/// Generic repository trait for CRUD operations
///
/// `T` is the stored entity, `D` the caller-supplied column values.
#[async_trait]
pub trait Repository<T, D>: Send + Sync {
    /// Find all entities, ascending by id
    async fn find_all(&self) -> Result<Vec<T>>;

    /// Find an entity by its ID
    async fn find_by_id(&self, id: i64) -> Result<Option<T>>;

    /// Insert a new entity and return it with its generated ID
    async fn create(&self, draft: &D) -> Result<T>;

    /// Replace every field of an existing entity; `None` when the ID is unknown
    async fn update(&self, id: i64, draft: &D) -> Result<Option<T>>;

    /// Delete an entity and return its last state; `None` when the ID is unknown
    async fn delete(&self, id: i64) -> Result<Option<T>>;
}

/// Store handle shared by the service layer
pub type RestaurantStore = dyn Repository<Restaurant, NewRestaurant>;

const RESTAURANT_COLUMNS: &str = "id, name, cuisine, rating";

fn map_restaurant(row: &Row<'_>) -> rusqlite::Result<Restaurant> {
    Ok(Restaurant {
        id: row.get(0)?,
        name: row.get(1)?,
        cuisine: row.get(2)?,
        rating: row.get(3)?,
    })
}

/// Repository for Restaurant entities
pub struct RestaurantRepository {
    db: Arc<DatabaseManager>,
}

impl RestaurantRepository {
    /// Create a new RestaurantRepository
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Repository<Restaurant, NewRestaurant> for RestaurantRepository {
    async fn find_all(&self) -> Result<Vec<Restaurant>> {
        self.db
            .execute(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM restaurants ORDER BY id ASC",
                    RESTAURANT_COLUMNS
                ))?;

                let restaurants = stmt
                    .query_map([], map_restaurant)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(restaurants)
            })
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Restaurant>> {
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM restaurants WHERE id = ?1", RESTAURANT_COLUMNS),
                        [id],
                        map_restaurant,
                    )
                    .optional()?)
            })
            .await
    }

    async fn create(&self, draft: &NewRestaurant) -> Result<Restaurant> {
        let draft = draft.clone();
        self.db
            .execute(move |conn| {
                Ok(conn.query_row(
                    &format!(
                        "INSERT INTO restaurants (name, cuisine, rating) VALUES (?1, ?2, ?3) \
                         RETURNING {}",
                        RESTAURANT_COLUMNS
                    ),
                    params![draft.name, draft.cuisine, draft.rating],
                    map_restaurant,
                )?)
            })
            .await
    }

    async fn update(&self, id: i64, draft: &NewRestaurant) -> Result<Option<Restaurant>> {
        let draft = draft.clone();
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!(
                            "UPDATE restaurants SET name = ?1, cuisine = ?2, rating = ?3 \
                             WHERE id = ?4 RETURNING {}",
                            RESTAURANT_COLUMNS
                        ),
                        params![draft.name, draft.cuisine, draft.rating, id],
                        map_restaurant,
                    )
                    .optional()?)
            })
            .await
    }

    async fn delete(&self, id: i64) -> Result<Option<Restaurant>> {
        self.db
            .execute(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("DELETE FROM restaurants WHERE id = ?1 RETURNING {}", RESTAURANT_COLUMNS),
                        [id],
                        map_restaurant,
                    )
                    .optional()?)
            })
            .await
    }
}
