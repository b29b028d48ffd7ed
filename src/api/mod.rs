mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let api = Router::new()
        // Analytics
        .route(
            "/analytics/rockets/most-launched",
            get(handlers::most_launched_rockets),
        )
        .route(
            "/analytics/providers/most-reliable",
            get(handlers::most_reliable_providers),
        )
        .route(
            "/analytics/providers/highest-revenue",
            get(handlers::highest_revenue_providers),
        )
        .route(
            "/analytics/launches/most-recent",
            get(handlers::most_recent_launches),
        )
        .route(
            "/analytics/launches/most-expensive",
            get(handlers::most_expensive_launches),
        )
        .route(
            "/analytics/orbits/{orbit}/dominant-country",
            get(handlers::dominant_country),
        )
        // Providers
        .route("/providers", get(handlers::list_providers))
        .route("/providers", post(handlers::create_provider))
        .route("/providers/{id}", get(handlers::get_provider))
        .route("/providers/{id}", delete(handlers::delete_provider))
        // Rockets
        .route("/rockets", get(handlers::list_rockets))
        .route("/rockets", post(handlers::create_rocket))
        .route("/rockets/{id}", get(handlers::get_rocket))
        .route("/rockets/{id}", put(handlers::update_rocket))
        .route("/rockets/{id}", delete(handlers::delete_rocket))
        // Launches
        .route("/launches", get(handlers::list_launches))
        .route("/launches", post(handlers::create_launch))
        .route("/launches/{id}", get(handlers::get_launch))
        .route("/launches/{id}", put(handlers::update_launch))
        .route("/launches/{id}", delete(handlers::delete_launch))
        // Users
        .route("/users", get(handlers::list_users))
        .route("/users", post(handlers::create_user))
        .route("/users/login", post(handlers::login))
        .route("/users/{id}", get(handlers::get_user))
        .route("/users/{id}", delete(handlers::delete_user))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
