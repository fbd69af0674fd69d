use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldErrors;

/// ApiError
///
/// Every failure a handler can surface, each mapped onto the status code and
/// field-keyed JSON body the client already understands. Errors are returned
/// to the caller as-is: nothing here is retried and nothing is fatal to the
/// process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client payload failed shape validation; the map is the response body.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// Lookup by id on the public post detail route found nothing.
    #[error("no post found with that id")]
    NoPost,

    /// A mutating operation referenced a post that does not exist.
    #[error("post not found")]
    PostNotFound,

    /// Comment removal referenced a comment id not present on the post.
    #[error("comment does not exist")]
    CommentNotFound,

    /// Ownership violation: the requester is not the post's creator.
    #[error("user not authorized")]
    NotAuthorized,

    /// Idempotency guard: the requester already likes this post.
    #[error("post already liked")]
    AlreadyLiked,

    /// Idempotency guard: the requester does not like this post.
    #[error("post not liked")]
    NotLiked,

    /// The requested user has no profile.
    #[error("no profile for this user")]
    NoProfile,

    /// The profile listing is empty.
    #[error("there are no profiles")]
    NoProfiles,

    /// Login attempted with an unknown email.
    #[error("user not found")]
    UserNotFound,

    /// Login attempted with the wrong password.
    #[error("password incorrect")]
    PasswordIncorrect,

    /// The document store failed; surfaced as the generic 404 the legacy
    /// contract used for store-level failures.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// bcrypt failed to hash or verify. Internal, never client-caused.
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// Token issuance failed. Validation failures are handled inside the
    /// AuthUser extractor and never reach this variant.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => {
                return (StatusCode::BAD_REQUEST, Json(errors)).into_response();
            }
            ApiError::NoPost => (
                StatusCode::BAD_REQUEST,
                json!({ "nopost": "No post found with that id" }),
            ),
            ApiError::PostNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "postnotfound": "No post found" }),
            ),
            ApiError::CommentNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "commentnotexist": "Comment does not exist" }),
            ),
            ApiError::NotAuthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "notauthorized": "User not authorized" }),
            ),
            ApiError::AlreadyLiked => (
                StatusCode::BAD_REQUEST,
                json!({ "alreadyliked": "User already liked this post" }),
            ),
            ApiError::NotLiked => (
                StatusCode::BAD_REQUEST,
                json!({ "notliked": "You have not yet liked this post" }),
            ),
            ApiError::NoProfile => (
                StatusCode::NOT_FOUND,
                json!({ "noprofile": "There is no profile for this user" }),
            ),
            ApiError::NoProfiles => (
                StatusCode::NOT_FOUND,
                json!({ "noprofile": "There are no profiles" }),
            ),
            ApiError::UserNotFound => {
                (StatusCode::NOT_FOUND, json!({ "email": "User not found" }))
            }
            ApiError::PasswordIncorrect => (
                StatusCode::BAD_REQUEST,
                json!({ "password": "Password incorrect" }),
            ),
            ApiError::Store(e) => {
                tracing::error!("store error: {:?}", e);
                (StatusCode::NOT_FOUND, json!({ "error": "Store error" }))
            }
            ApiError::Hash(e) => {
                tracing::error!("bcrypt error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
            ApiError::Token(e) => {
                tracing::error!("token error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
