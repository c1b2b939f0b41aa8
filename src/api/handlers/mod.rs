pub mod restaurants;
pub mod system;

pub use restaurants::*;
pub use system::*;

use crate::core::services::RestaurantService;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub restaurant_service: Arc<RestaurantService>,
}
