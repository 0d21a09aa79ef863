//! HTTP API Layer
//!
//! REST API for flight compensation claims using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: eligibility checks, claim intake and lifecycle, health
//! - **Middleware**: JWT authentication, audit logging, request tracing
//! - **DTOs**: request/response bodies
//! - **Error Handling**: `ApiError` renders JSON `{error, message, details}`
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let service = ClaimService::new(Arc::new(PostgresClaimAdapter::new(pool)), engine);
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_claims::ClaimService;

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{claims, eligibility, health};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClaimService>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(service: ClaimService, config: ApiConfig) -> Router {
    let state = AppState {
        service: Arc::new(service),
        config,
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/v1/eligibility", post(eligibility::check_eligibility));

    let claims_routes = Router::new()
        .route("/", post(claims::create_claim).get(claims::list_claims))
        .route("/summary", get(claims::status_summary))
        .route("/:id", get(claims::get_claim))
        .route("/:id/eligibility", post(claims::check_eligibility))
        .route("/:id/events", post(claims::apply_event))
        .route("/:id/settlement", post(claims::offer_settlement));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
