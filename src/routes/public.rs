use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints that are **unauthenticated** and accessible to any client,
/// anonymous or logged-in: the identity gateway (register/login) and the
/// read-only post and profile views the feed renders before login.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Unauthenticated endpoint for monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // POST /api/users/register
        // New account creation. Password hashing and duplicate-email checks
        // happen in the handler.
        .route("/api/users/register", post(handlers::register_user))
        // POST /api/users/login
        // Credential check; issues the bearer token the client attaches to
        // every authenticated request.
        .route("/api/users/login", post(handlers::login_user))
        // GET /api/posts
        // The whole feed, newest first.
        .route("/api/posts", get(handlers::get_posts))
        // GET /api/posts/{post_id}
        // Single post detail. A miss reports 400 `nopost`.
        .route("/api/posts/{post_id}", get(handlers::get_post))
        // GET /api/profile/all
        // Every developer profile in the system.
        .route("/api/profile/all", get(handlers::get_all_profiles))
        // GET /api/profile/handle/{handle}
        // Profile lookup by its URL-friendly handle.
        .route(
            "/api/profile/handle/{handle}",
            get(handlers::get_profile_by_handle),
        )
}
