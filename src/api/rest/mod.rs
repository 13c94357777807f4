//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! ## Chargebacks
//! - `POST /chargebacks` - Open a chargeback
//!
//! ## Health
//! - `GET /health` - Liveness check, no store access
//!
//! Any other method on these paths answers 405; unknown paths answer 404.
//! Every error body is `{"error": "<message>"}`.
//!
//! # Usage
//!
//! ```ignore
//! use chargeback_api::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(create_chargeback, "1.0.0"));
//! let router = create_router(state, Duration::from_secs(30));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, CreateChargebackBody, ErrorResponse, HealthResponse, SERVICE_NAME,
};
pub use routes::create_router;
