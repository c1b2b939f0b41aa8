//! Database models
//!
//! Data structures representing database tables

use serde::{Deserialize, Serialize};

/// Restaurant record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
}

/// Column values for an insert or a full-field replace; `id` is owned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub name: String,
    pub cuisine: String,
    pub rating: f64,
}
