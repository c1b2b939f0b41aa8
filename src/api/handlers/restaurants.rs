use crate::api::models::{RestaurantRequest, RestaurantResponse};
use crate::core::error::{ApiError, Result};
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use super::AppState;

/// Restaurant id taken from the `:id` path segment
///
/// Anything that is not a 64-bit integer is answered with 404 before the
/// store is consulted, since no restaurant can have such an id. A leading
/// `+` or zeros are accepted: `+5` and `007` name ids 5 and 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestaurantId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for RestaurantId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::NotFound(format!("unreadable id segment: {}", e)))?;

        raw.parse::<i64>()
            .map(RestaurantId)
            .map_err(|_| ApiError::NotFound(format!("malformed restaurant id '{}'", raw)))
    }
}

/// Unwrap a JSON object body, treating anything else as a validation failure
fn request_body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<RestaurantRequest> {
    let Json(body) = payload.map_err(|rejection| ApiError::ValidationError(rejection.body_text()))?;

    RestaurantRequest::from_json(body)
        .ok_or_else(|| ApiError::ValidationError("body must be a JSON object".to_string()))
}

/// Handler for GET /restaurants - List all restaurants
pub async fn list_restaurants(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let restaurants: Vec<RestaurantResponse> = state
        .restaurant_service
        .list()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(restaurants))
}

/// Handler for GET /restaurants/:id - Get a restaurant
pub async fn get_restaurant(
    State(state): State<AppState>,
    RestaurantId(id): RestaurantId,
) -> Result<impl IntoResponse> {
    let restaurant = state.restaurant_service.get(id).await?;
    Ok(Json(RestaurantResponse::from(restaurant)))
}

/// Handler for POST /restaurants - Create a restaurant
pub async fn create_restaurant(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let request = request_body(payload)?;
    let restaurant = state.restaurant_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(RestaurantResponse::from(restaurant))))
}

/// Handler for PUT /restaurants/:id - Replace every field of a restaurant
pub async fn update_restaurant(
    State(state): State<AppState>,
    RestaurantId(id): RestaurantId,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let request = request_body(payload)?;
    let restaurant = state.restaurant_service.update(id, request).await?;

    Ok(Json(RestaurantResponse::from(restaurant)))
}

/// Handler for DELETE /restaurants/:id - Delete a restaurant and return its last state
pub async fn delete_restaurant(
    State(state): State<AppState>,
    RestaurantId(id): RestaurantId,
) -> Result<impl IntoResponse> {
    let restaurant = state.restaurant_service.delete(id).await?;
    Ok(Json(RestaurantResponse::from(restaurant)))
}
