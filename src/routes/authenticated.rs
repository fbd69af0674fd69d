use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Authenticated Router Module
///
/// Every route a logged-in user can hit: posting, liking, commenting, and
/// managing their own profile.
///
/// Access Control Strategy:
/// Every handler here relies on the `AuthUser` extractor middleware layered
/// above this module, guaranteeing a validated identity. Ownership checks
/// (post deletion) happen inside the handlers against that identity.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/users/current
        // The requester's own public user record.
        .route("/api/users/current", get(handlers::current_user))
        // --- Posts ---
        // POST /api/posts
        // Submits a new post owned by the authenticated user.
        .route("/api/posts", post(handlers::create_post))
        // DELETE /api/posts/{post_id}
        // Owner-only removal; a non-owner gets 401 `notauthorized`.
        .route("/api/posts/{post_id}", delete(handlers::delete_post))
        // POST /api/posts/like/{id}
        // Records a like. The one-like-per-user guard rejects a second like
        // with 400 `alreadyliked`.
        .route("/api/posts/like/{id}", post(handlers::like_post))
        // POST /api/posts/unlike/{id}
        // Withdraws a like; 400 `notliked` when there is nothing to withdraw.
        .route("/api/posts/unlike/{id}", post(handlers::unlike_post))
        // --- Comments ---
        // POST /api/posts/comment/{id}
        // Prepends a comment to the post; body validated like a post.
        .route("/api/posts/comment/{id}", post(handlers::add_comment))
        // DELETE /api/posts/comment/{id}/{comment_id}
        // Removes the comment carrying that id from the post.
        .route(
            "/api/posts/comment/{id}/{comment_id}",
            delete(handlers::remove_comment),
        )
        // --- Profile ---
        // GET /api/profile
        // The requester's own profile; 404 `noprofile` before first save.
        .route(
            "/api/profile",
            get(handlers::get_my_profile)
                // POST /api/profile
                // Creates or updates the profile (upsert keyed on the user).
                .post(handlers::upsert_profile)
                // DELETE /api/profile
                // Removes the profile and the user account itself.
                .delete(handlers::delete_account),
        )
}
