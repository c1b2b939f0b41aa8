//! API routes

use crate::api::handlers::{
    about, create_restaurant, delete_restaurant, get_restaurant, health_check, home,
    list_restaurants, update_restaurant, AppState,
};
use axum::{routing::get, Router};

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    Router::new()
        // Fixed-text and liveness endpoints
        .route("/", get(home))
        .route("/about", get(about))
        .route("/health", get(health_check))
        // Restaurant CRUD endpoints
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route(
            "/restaurants/:id",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .with_state(state)
}
