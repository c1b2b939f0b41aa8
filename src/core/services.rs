//! Business logic services
//!
//! The service layer sits between the HTTP handlers and the repository. It
//! validates input before any store access and turns missing rows into
//! [`ApiError::NotFound`], so handlers only ever see a record or a tagged error.

use crate::api::models::RestaurantRequest;
use crate::core::error::{ApiError, Result};
use crate::db::models::{NewRestaurant, Restaurant};
use crate::db::repository::RestaurantStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Restaurant service for managing restaurant business logic
pub struct RestaurantService {
    repo: Arc<RestaurantStore>,
}

impl RestaurantService {
    /// Create a new RestaurantService
    pub fn new(repo: Arc<RestaurantStore>) -> Self {
        Self { repo }
    }

    /// Get all restaurants, ascending by id
    pub async fn list(&self) -> Result<Vec<Restaurant>> {
        self.repo.find_all().await
    }

    /// Get a restaurant by ID
    pub async fn get(&self, id: i64) -> Result<Restaurant> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ApiError::restaurant_not_found(id))
    }

    /// Create a new restaurant
    pub async fn create(&self, request: RestaurantRequest) -> Result<Restaurant> {
        let draft = validate_request(&request)?;
        let restaurant = self.repo.create(&draft).await?;

        info!(id = restaurant.id, name = %restaurant.name, "Restaurant created");
        Ok(restaurant)
    }

    /// Replace every field of an existing restaurant
    pub async fn update(&self, id: i64, request: RestaurantRequest) -> Result<Restaurant> {
        let draft = validate_request(&request)?;
        let restaurant = self
            .repo
            .update(id, &draft)
            .await?
            .ok_or_else(|| ApiError::restaurant_not_found(id))?;

        info!(id, "Restaurant updated");
        Ok(restaurant)
    }

    /// Delete a restaurant, returning the state it had before deletion
    pub async fn delete(&self, id: i64) -> Result<Restaurant> {
        let restaurant = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| ApiError::restaurant_not_found(id))?;

        info!(id, "Restaurant deleted");
        Ok(restaurant)
    }
}

/// Check that `name` and `cuisine` are non-empty strings and `rating` is a JSON number
///
/// A rating sent as a string (`"5"`) is rejected even when it would parse.
pub fn validate_request(request: &RestaurantRequest) -> Result<NewRestaurant> {
    let name = required_text(request.name.as_ref(), "name")?;
    let cuisine = required_text(request.cuisine.as_ref(), "cuisine")?;

    let rating = match request.rating.as_ref() {
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            ApiError::ValidationError("rating is out of range".to_string())
        })?,
        Some(_) => {
            return Err(ApiError::ValidationError(
                "rating must be a number".to_string(),
            ))
        }
        None => return Err(ApiError::ValidationError("rating is required".to_string())),
    };

    Ok(NewRestaurant {
        name,
        cuisine,
        rating,
    })
}

fn required_text(value: Option<&Value>, field: &str) -> Result<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(ApiError::ValidationError(format!(
            "{} cannot be empty",
            field
        ))),
        Some(_) => Err(ApiError::ValidationError(format!(
            "{} must be a string",
            field
        ))),
        None => Err(ApiError::ValidationError(format!("{} is required", field))),
    }
}
