use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// The canonical identity record stored in the `users` table. The `password`
/// field carries the bcrypt hash and is deliberately **not** serializable;
/// everything leaving the API goes through [`UserResponse`] instead.
#[derive(Debug, Clone, FromRow, Default)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    // The user's primary identifier, unique across the system.
    pub email: String,
    // bcrypt hash, never the plaintext.
    pub password: String,
    // Derived from the email at registration (DiceBear seed). The client may
    // also echo it back when creating posts/comments.
    pub avatar: Option<String>,
    pub date: DateTime<Utc>,
}

/// UserResponse
///
/// The public representation of a user, returned by registration and the
/// `/api/users/current` endpoint. Excludes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            date: user.date,
        }
    }
}

/// Profile
///
/// A user's developer profile from the `profiles` table. One per user; the
/// owner reference serializes as `user` to match the wire contract the client
/// already speaks.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    /// Maps SQL column "user_id" to the wire field "user".
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    // Unique, URL-friendly profile name.
    pub handle: String,
    pub status: String,
    /// Stored as a JSONB array; entered by the client as a comma-separated
    /// string and split at the handler boundary.
    #[sqlx(json)]
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
}

/// Post
///
/// A user-authored content item with embedded likes and comments, stored in
/// the `posts` table. The embedded sequences live in JSONB columns so the
/// whole post reads and writes as one document: every like/unlike/comment
/// operation is a single read-modify-write of this structure, and the store
/// serializes concurrent writers per row.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    /// Maps SQL column "user_id" to the wire field "user" (owner reference).
    #[sqlx(rename = "user_id")]
    pub user: Uuid,
    pub text: String,
    // Author display name, denormalized onto the post by the client.
    pub name: String,
    pub avatar: Option<String>,
    /// At most one entry per user; newest first.
    #[sqlx(json)]
    pub likes: Vec<Like>,
    /// Insertion order, newest first.
    #[sqlx(json)]
    pub comments: Vec<Comment>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
}

impl Post {
    /// Builds a fresh post owned by `user` with empty likes and comments.
    pub fn new(user: Uuid, text: String, name: String, avatar: Option<String>) -> Self {
        Post {
            id: Uuid::new_v4(),
            user,
            text,
            name,
            avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        }
    }

    /// True if `user` already appears in the likes sequence.
    pub fn liked_by(&self, user: Uuid) -> bool {
        self.likes.iter().any(|like| like.user == user)
    }

    /// Prepends a like for `user`. Returns false (and leaves the sequence
    /// untouched) if the user has already liked this post.
    pub fn add_like(&mut self, user: Uuid) -> bool {
        if self.liked_by(user) {
            return false;
        }
        self.likes.insert(0, Like { user });
        true
    }

    /// Removes the first like matching `user`. Returns false if the user had
    /// not liked this post.
    pub fn remove_like(&mut self, user: Uuid) -> bool {
        match self.likes.iter().position(|like| like.user == user) {
            Some(index) => {
                self.likes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Prepends `comment` to the comments sequence.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
    }

    /// Removes the first comment carrying `comment_id`. Keyed on the comment
    /// id rather than a positional index. Returns false if no comment
    /// matches.
    pub fn remove_comment(&mut self, comment_id: Uuid) -> bool {
        match self
            .comments
            .iter()
            .position(|comment| comment.id == comment_id)
        {
            Some(index) => {
                self.comments.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Like
///
/// A single user-reference record denoting one user's endorsement of a post.
/// Lives inside the post document's `likes` array.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Like {
    pub user: Uuid,
}

/// Comment
///
/// A nested user-authored reply embedded in the post document's `comments`
/// array. The id is generated server-side at insertion and is the key used
/// for removal.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct Comment {
    pub id: Uuid,
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
    #[ts(type = "string")]
    pub date: DateTime<Utc>,
}

impl Comment {
    /// Builds a comment authored by `user` with a freshly generated id.
    pub fn new(user: Uuid, text: String, name: String, avatar: Option<String>) -> Self {
        Comment {
            id: Uuid::new_v4(),
            user,
            text,
            name,
            avatar,
            date: Utc::now(),
        }
    }
}

/// --- Request Payloads (Input Schemas) ---

/// RegisterRequest
///
/// Input payload for the public registration endpoint (POST /api/users/register).
/// The password is hashed before it ever reaches the repository.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// LoginRequest
///
/// Input payload for the login endpoint (POST /api/users/login).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// TokenResponse
///
/// Output of a successful login: a ready-to-use `Authorization` header value
/// ("Bearer <jwt>").
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// CreatePostRequest
///
/// Input payload for submitting a new post. The author's display name and
/// avatar are denormalized here by the client; the owner reference always
/// comes from the authenticated identity, never the payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreatePostRequest {
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// CreateCommentRequest
///
/// Input payload for commenting on a post. Shape and validation are identical
/// to post creation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct CreateCommentRequest {
    pub text: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// ProfileRequest
///
/// Input payload for creating or updating the requester's profile
/// (POST /api/profile). `skills` arrives as the comma-separated string the
/// client form produces and is split server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ProfileRequest {
    pub handle: String,
    pub status: String,
    /// Comma-separated, e.g. "HTML,CSS,Rust".
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
}

impl ProfileRequest {
    /// Splits the comma-separated skills field into the stored list, dropping
    /// empty segments.
    pub fn skills_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect()
    }
}

/// SuccessResponse
///
/// The `{"success": true}` body the delete endpoints return.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        SuccessResponse { success: true }
    }
}
