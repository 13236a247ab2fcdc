pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::JwtVerifier;
use crate::handlers::{access, health, news};
use crate::services::NewsService;

/// Dependencies shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub news: NewsService,
    pub verifier: JwtVerifier,
}

impl AppState {
    pub fn new(news: NewsService, verifier: JwtVerifier) -> Self {
        Self { news, verifier }
    }
}

/// Build the HTTP application. CORS runs outside the JWT guard so preflight
/// requests are answered before authentication.
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::jwt_auth_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors_layer(cors_origins)),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Public
        .route("/health", get(health::health))
        .route("/test/public", get(access::public_endpoint))
        // Protected
        .route("/test/protected", get(access::protected_endpoint))
        .route("/news", get(news::list).post(news::create))
        .route("/news/categories", get(news::categories))
        .route("/news/category/:category", get(news::by_category))
        .route(
            "/news/:id",
            get(news::get).put(news::update).delete(news::delete),
        )
}
