use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/profile/icon", put(handlers::update_profile_icon))
        // Recommendations
        .route("/recommend", post(handlers::recommend))
        .route("/favorites", post(handlers::favorites))
        .route("/history", get(handlers::history))
        // Community posts
        .route("/posts", get(handlers::get_posts).post(handlers::create_post))
        .route(
            "/posts/:post_id",
            put(handlers::edit_post).delete(handlers::delete_post),
        )
        .route("/posts/:post_id/comments", post(handlers::add_comment))
}
