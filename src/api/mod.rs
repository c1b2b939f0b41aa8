//! REST API module
//!
//! This module provides the HTTP server and REST API endpoints including:
//! - API routing and request handling
//! - Rate limiting and request id middleware
//! - Error handling and response formatting

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use middleware::{request_id_middleware, RateLimiter, RequestId, REQUEST_ID_HEADER};
pub use models::{RestaurantRequest, RestaurantResponse};
pub use server::ApiServer;
