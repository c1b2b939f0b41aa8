//! Core application module
//!
//! This module provides the application layer including:
//! - Restaurant business logic and input validation
//! - Configuration management
//! - Structured logging system
//! - Error handling and type system

pub mod config;
pub mod error;
pub mod logging;
pub mod services;

pub use config::Config;
pub use error::{ApiError, ErrorResponse, Result};
pub use logging::Logger;
pub use services::RestaurantService;
