use crate::db::models::Restaurant;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for creating or fully replacing a restaurant
///
/// Fields stay as raw JSON so validation can tell a missing field from one
/// with the wrong type (a rating of `"5"` must be rejected, not coerced).
/// Only a JSON object yields a request; `null` members count as missing.
#[derive(Debug, Default)]
pub struct RestaurantRequest {
    pub name: Option<Value>,
    pub cuisine: Option<Value>,
    pub rating: Option<Value>,
}

impl RestaurantRequest {
    /// Read the three fields out of a request body, `None` unless it is an object
    pub fn from_json(body: Value) -> Option<Self> {
        match body {
            Value::Object(mut fields) => Some(Self {
                name: take_field(&mut fields, "name"),
                cuisine: take_field(&mut fields, "cuisine"),
                rating: take_field(&mut fields, "rating"),
            }),
            _ => None,
        }
    }
}

fn take_field(fields: &mut Map<String, Value>, key: &str) -> Option<Value> {
    fields.remove(key).filter(|value| !value.is_null())
}

/// Response for restaurant operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantResponse {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            cuisine: restaurant.cuisine,
            rating: restaurant.rating,
        }
    }
}
