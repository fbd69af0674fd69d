use crate::{
    AppState,
    auth::{AuthUser, issue_token},
    error::ApiError,
    models::{
        self, Comment, CreateCommentRequest, CreatePostRequest, LoginRequest, Post, Profile,
        ProfileRequest, RegisterRequest, SuccessResponse, TokenResponse, UserResponse,
    },
    validation::{
        FieldErrors, validate_login_input, validate_post_input, validate_profile_input,
        validate_register_input,
    },
};
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use uuid::Uuid;

// --- Post Handlers ---

/// create_post
///
/// [Authenticated Route] Submits a new post. The text is validated before
/// anything touches the store; the owner reference is always the
/// authenticated identity, never anything in the payload.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 200, description = "Created", body = Post),
        (status = 400, description = "Validation errors")
    )
)]
pub async fn create_post(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let outcome = validate_post_input(&payload.text);
    if !outcome.is_valid() {
        return Err(ApiError::Validation(outcome.errors));
    }

    let post = Post::new(id, payload.text, payload.name, payload.avatar);
    let created = state.repo.create_post(post).await?;
    Ok(Json(created))
}

/// get_posts
///
/// [Public Route] Lists every post, newest first. No pagination, no
/// filtering.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses((status = 200, description = "All posts", body = [Post]))
)]
pub async fn get_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.repo.find_posts().await?;
    Ok(Json(posts))
}

/// get_post
///
/// [Public Route] Retrieves a single post by id. A miss is reported as a 400
/// with a `nopost` body; only store failures surface as 404, matching the
/// contract the client was built against.
#[utoipa::path(
    get,
    path = "/api/posts/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 400, description = "No post with that id")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    match state.repo.find_post(post_id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::NoPost),
    }
}

/// delete_post
///
/// [Authenticated Route] Permanently removes a post.
///
/// *Authorization*: **Owner-Only**. The requester must be the post's
/// creator; anyone else gets 401 and the post stands untouched.
#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 401, description = "Not the owner"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn delete_post(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let post = state
        .repo
        .find_post(post_id)
        .await?
        .ok_or(ApiError::PostNotFound)?;

    if post.user != id {
        return Err(ApiError::NotAuthorized);
    }

    if !state.repo.delete_post(post_id).await? {
        // Lost a race with another delete.
        return Err(ApiError::PostNotFound);
    }
    Ok(Json(SuccessResponse::ok()))
}

/// like_post
///
/// [Authenticated Route] Records the requester's like on a post.
///
/// *Idempotency guard*: a second like from the same user is rejected with
/// `alreadyliked` and leaves the sequence unchanged. The whole operation is
/// one read-modify-write of the post document.
#[utoipa::path(
    post,
    path = "/api/posts/like/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Already liked"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn like_post(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let mut post = state
        .repo
        .find_post(post_id)
        .await?
        .ok_or(ApiError::PostNotFound)?;

    if !post.add_like(id) {
        return Err(ApiError::AlreadyLiked);
    }

    if !state.repo.update_post(&post).await? {
        return Err(ApiError::PostNotFound);
    }
    Ok(Json(post))
}

/// unlike_post
///
/// [Authenticated Route] Withdraws the requester's like. Rejected with
/// `notliked` when there is nothing to withdraw.
#[utoipa::path(
    post,
    path = "/api/posts/unlike/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Not yet liked"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn unlike_post(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let mut post = state
        .repo
        .find_post(post_id)
        .await?
        .ok_or(ApiError::PostNotFound)?;

    if !post.remove_like(id) {
        return Err(ApiError::NotLiked);
    }

    if !state.repo.update_post(&post).await? {
        return Err(ApiError::PostNotFound);
    }
    Ok(Json(post))
}

/// add_comment
///
/// [Authenticated Route] Prepends a comment to a post. Validation is
/// identical to post creation; the comment id is generated server-side and
/// is the key later used for removal.
#[utoipa::path(
    post,
    path = "/api/posts/comment/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = CreateCommentRequest,
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 400, description = "Validation errors"),
        (status = 404, description = "Post not found")
    )
)]
pub async fn add_comment(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<Uuid>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<Post>, ApiError> {
    let outcome = validate_post_input(&payload.text);
    if !outcome.is_valid() {
        return Err(ApiError::Validation(outcome.errors));
    }

    let mut post = state
        .repo
        .find_post(post_id)
        .await?
        .ok_or(ApiError::PostNotFound)?;

    post.add_comment(Comment::new(id, payload.text, payload.name, payload.avatar));

    if !state.repo.update_post(&post).await? {
        return Err(ApiError::PostNotFound);
    }
    Ok(Json(post))
}

/// remove_comment
///
/// [Authenticated Route] Removes a comment from a post, keyed strictly on
/// the comment id (never a positional index), and returns the updated post.
#[utoipa::path(
    delete,
    path = "/api/posts/comment/{id}/{comment_id}",
    params(
        ("id" = Uuid, Path, description = "Post ID"),
        ("comment_id" = Uuid, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Updated post", body = Post),
        (status = 404, description = "Post or comment not found")
    )
)]
pub async fn remove_comment(
    AuthUser { id: _user_id, .. }: AuthUser,
    State(state): State<AppState>,
    Path((post_id, comment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Post>, ApiError> {
    let mut post = state
        .repo
        .find_post(post_id)
        .await?
        .ok_or(ApiError::PostNotFound)?;

    if !post.remove_comment(comment_id) {
        return Err(ApiError::CommentNotFound);
    }

    if !state.repo.update_post(&post).await? {
        return Err(ApiError::PostNotFound);
    }
    Ok(Json(post))
}

// --- User Handlers ---

/// register_user
///
/// [Public Route] Creates a new account. The password is bcrypt-hashed
/// before it reaches the repository, and the avatar URL is derived from the
/// email (DiceBear gives a stable image per address, the same trick the old
/// gravatar integration relied on).
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered", body = UserResponse),
        (status = 400, description = "Validation errors or duplicate email")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let outcome = validate_register_input(&payload);
    if !outcome.is_valid() {
        return Err(ApiError::Validation(outcome.errors));
    }

    if state
        .repo
        .find_user_by_email(&payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation(FieldErrors::from([(
            "email",
            "Email already exists".to_string(),
        )])));
    }

    let hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)?;
    let avatar = format!(
        "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
        payload.email
    );

    let user = models::User {
        id: Uuid::new_v4(),
        name: payload.name,
        email: payload.email,
        password: hash,
        avatar: Some(avatar),
        date: Utc::now(),
    };

    let created = state.repo.create_user(user).await?;
    Ok(Json(UserResponse::from(created)))
}

/// login_user
///
/// [Public Route] Verifies the credentials and returns a signed bearer token
/// ready to be used as an `Authorization` header value.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Validation errors or wrong password"),
        (status = 404, description = "Unknown email")
    )
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let outcome = validate_login_input(&payload);
    if !outcome.is_valid() {
        return Err(ApiError::Validation(outcome.errors));
    }

    let user = state
        .repo
        .find_user_by_email(&payload.email)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    if !bcrypt::verify(&payload.password, &user.password)? {
        return Err(ApiError::PasswordIncorrect);
    }

    let token = issue_token(user.id, &state.config.jwt_secret)?;
    Ok(Json(TokenResponse {
        success: true,
        token: format!("Bearer {token}"),
    }))
}

/// current_user
///
/// [Authenticated Route] Returns the requester's public user record.
#[utoipa::path(
    get,
    path = "/api/users/current",
    responses((status = 200, description = "Current user", body = UserResponse))
)]
pub async fn current_user(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .repo
        .find_user(id)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(UserResponse::from(user)))
}

// --- Profile Handlers ---

/// get_my_profile
///
/// [Authenticated Route] The requester's own profile, 404 `noprofile` when
/// they have not created one yet.
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 404, description = "No profile yet")
    )
)]
pub async fn get_my_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Profile>, ApiError> {
    match state.repo.find_profile(id).await? {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::NoProfile),
    }
}

/// upsert_profile
///
/// [Authenticated Route] Creates or updates the requester's profile. The
/// handle must not be held by anyone else; re-submitting one's own handle is
/// an ordinary update.
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = Profile),
        (status = 400, description = "Validation errors or handle taken")
    )
)]
pub async fn upsert_profile(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let outcome = validate_profile_input(&payload);
    if !outcome.is_valid() {
        return Err(ApiError::Validation(outcome.errors));
    }

    if let Some(existing) = state.repo.find_profile_by_handle(&payload.handle).await? {
        if existing.user != id {
            return Err(ApiError::Validation(FieldErrors::from([(
                "handle",
                "That handle already exists".to_string(),
            )])));
        }
    }

    let skills = payload.skills_list();
    let profile = Profile {
        id: Uuid::new_v4(),
        user: id,
        handle: payload.handle.trim().to_string(),
        status: payload.status,
        skills,
        company: payload.company,
        website: payload.website,
        location: payload.location,
        bio: payload.bio,
        github_username: payload.github_username,
        date: Utc::now(),
    };

    let saved = state.repo.upsert_profile(profile).await?;
    Ok(Json(saved))
}

/// get_profile_by_handle
///
/// [Public Route] Profile lookup by its URL-friendly handle.
#[utoipa::path(
    get,
    path = "/api/profile/handle/{handle}",
    params(("handle" = String, Path, description = "Profile handle")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 404, description = "No profile for that handle")
    )
)]
pub async fn get_profile_by_handle(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    match state.repo.find_profile_by_handle(&handle).await? {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::NoProfile),
    }
}

/// get_all_profiles
///
/// [Public Route] Every profile in the system; an empty system reports
/// 404 `noprofile` rather than an empty array, which is what the client
/// expects.
#[utoipa::path(
    get,
    path = "/api/profile/all",
    responses(
        (status = 200, description = "Profiles", body = [Profile]),
        (status = 404, description = "No profiles exist")
    )
)]
pub async fn get_all_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    let profiles = state.repo.find_profiles().await?;
    if profiles.is_empty() {
        return Err(ApiError::NoProfiles);
    }
    Ok(Json(profiles))
}

/// delete_account
///
/// [Authenticated Route] Removes the requester's profile and user record.
/// Their posts stay up, owned by a now-dangling reference, exactly as the
/// legacy application behaved.
#[utoipa::path(
    delete,
    path = "/api/profile",
    responses((status = 200, description = "Account removed", body = SuccessResponse))
)]
pub async fn delete_account(
    AuthUser { id, .. }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.repo.delete_profile(id).await?;
    state.repo.delete_user(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
