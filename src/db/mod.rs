//! Database module
//!
//! This module provides database management functionality including:
//! - Database connection pool management
//! - Repository pattern implementations
//! - Table bootstrap
//! - Data models

pub mod manager;
pub mod models;
pub mod repository;
pub mod schema;

pub use manager::DatabaseManager;
pub use models::{NewRestaurant, Restaurant};
pub use repository::{Repository, RestaurantRepository, RestaurantStore};
