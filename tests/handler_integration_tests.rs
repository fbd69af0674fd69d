use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use devconnector::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    error::ApiError,
    handlers,
    models::{CreateCommentRequest, CreatePostRequest, Post, ProfileRequest, User},
    repository::MemoryRepository,
};
use std::sync::Arc;
use tokio::test;
use uuid::Uuid;

// --- TEST UTILITIES ---

// Handlers only see the Repository trait, so the whole post lifecycle can be
// driven against the in-memory implementation with no database.
fn create_test_state() -> AppState {
    AppState {
        repo: Arc::new(MemoryRepository::new()),
        config: AppConfig::default(),
    }
}

// Seeds a user directly through the repository and returns the identity the
// handlers expect.
async fn seed_user(state: &AppState, name: &str) -> AuthUser {
    let user = User {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{name}@example.com"),
        password: "irrelevant-hash".to_string(),
        avatar: None,
        date: Utc::now(),
    };
    let created = state.repo.create_user(user).await.expect("seed user");
    AuthUser {
        id: created.id,
        name: created.name,
        email: created.email,
        avatar: created.avatar,
    }
}

fn post_payload(text: &str, name: &str) -> CreatePostRequest {
    CreatePostRequest {
        text: text.to_string(),
        name: name.to_string(),
        avatar: None,
    }
}

fn comment_payload(text: &str, name: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        text: text.to_string(),
        name: name.to_string(),
        avatar: None,
    }
}

// Creates a post through the handler and returns the body.
async fn create_post(state: &AppState, author: &AuthUser, text: &str) -> Post {
    let Json(post) = handlers::create_post(
        author.clone(),
        State(state.clone()),
        Json(post_payload(text, &author.name)),
    )
    .await
    .expect("create post");
    post
}

// --- CREATE / READ ---

#[test]
async fn test_create_post_owner_is_requester() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let post = create_post(&state, &alice, "hello world, first post").await;

    assert_eq!(post.user, alice.id);
    assert!(post.likes.is_empty());
    assert!(post.comments.is_empty());
}

#[test]
async fn test_create_post_rejects_short_text() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let result = handlers::create_post(
        alice,
        State(state.clone()),
        Json(post_payload("short", "alice")),
    )
    .await;

    match result {
        Err(ApiError::Validation(errors)) => {
            assert_eq!(
                errors.get("text").map(String::as_str),
                Some("Post must be between 10 and 300 characters")
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    // Nothing was persisted.
    let Json(posts) = handlers::get_posts(State(state)).await.unwrap();
    assert!(posts.is_empty());
}

#[test]
async fn test_get_posts_newest_first() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let first = create_post(&state, &alice, "the first post of the feed").await;
    let second = create_post(&state, &alice, "the second post of the feed").await;

    let Json(posts) = handlers::get_posts(State(state)).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, second.id);
    assert_eq!(posts[1].id, first.id);
}

#[test]
async fn test_get_post_unknown_id_is_nopost() {
    let state = create_test_state();

    let result = handlers::get_post(State(state), Path(Uuid::new_v4())).await;

    assert!(matches!(result, Err(ApiError::NoPost)));
    // The miss renders as the legacy 400 body, not a 404.
    let response = result.unwrap_err().into_response();
    assert_eq!(response.status(), 400);
}

// --- DELETE & OWNERSHIP ---

#[test]
async fn test_delete_post_by_non_owner_unauthorized() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let mallory = seed_user(&state, "mallory").await;

    let post = create_post(&state, &alice, "alice writes about her day").await;

    let result = handlers::delete_post(mallory, State(state.clone()), Path(post.id)).await;
    assert!(matches!(result, Err(ApiError::NotAuthorized)));

    // The post is untouched.
    let Json(found) = handlers::get_post(State(state), Path(post.id)).await.unwrap();
    assert_eq!(found.id, post.id);
    assert_eq!(found.text, post.text);
}

#[test]
async fn test_delete_post_by_owner_succeeds() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let post = create_post(&state, &alice, "a post that will not last").await;

    let Json(body) = handlers::delete_post(alice, State(state.clone()), Path(post.id))
        .await
        .unwrap();
    assert!(body.success);

    let result = handlers::get_post(State(state), Path(post.id)).await;
    assert!(matches!(result, Err(ApiError::NoPost)));
}

#[test]
async fn test_delete_missing_post_is_postnotfound() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let result = handlers::delete_post(alice, State(state), Path(Uuid::new_v4())).await;
    assert!(matches!(result, Err(ApiError::PostNotFound)));
}

// --- LIKE / UNLIKE ---

#[test]
async fn test_like_twice_is_rejected_and_length_unchanged() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let post = create_post(&state, &alice, "something worth endorsing").await;

    let Json(liked) = handlers::like_post(bob.clone(), State(state.clone()), Path(post.id))
        .await
        .unwrap();
    assert_eq!(liked.likes.len(), 1);
    assert_eq!(liked.likes[0].user, bob.id);

    let result = handlers::like_post(bob, State(state.clone()), Path(post.id)).await;
    assert!(matches!(result, Err(ApiError::AlreadyLiked)));

    let Json(found) = handlers::get_post(State(state), Path(post.id)).await.unwrap();
    assert_eq!(found.likes.len(), 1);
}

#[test]
async fn test_likes_prepend_newest_first() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;
    let carol = seed_user(&state, "carol").await;

    let post = create_post(&state, &alice, "a post collecting some likes").await;

    handlers::like_post(bob.clone(), State(state.clone()), Path(post.id))
        .await
        .unwrap();
    let Json(updated) = handlers::like_post(carol.clone(), State(state.clone()), Path(post.id))
        .await
        .unwrap();

    assert_eq!(updated.likes.len(), 2);
    assert_eq!(updated.likes[0].user, carol.id);
    assert_eq!(updated.likes[1].user, bob.id);
}

#[test]
async fn test_unlike_removes_exactly_one_entry() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;
    let carol = seed_user(&state, "carol").await;

    let post = create_post(&state, &alice, "likes come and likes go here").await;

    handlers::like_post(bob.clone(), State(state.clone()), Path(post.id))
        .await
        .unwrap();
    handlers::like_post(carol.clone(), State(state.clone()), Path(post.id))
        .await
        .unwrap();

    let Json(updated) = handlers::unlike_post(bob.clone(), State(state.clone()), Path(post.id))
        .await
        .unwrap();

    assert_eq!(updated.likes.len(), 1);
    assert_eq!(updated.likes[0].user, carol.id);
}

#[test]
async fn test_unlike_without_like_is_rejected() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let post = create_post(&state, &alice, "nobody has liked this one yet").await;

    let result = handlers::unlike_post(bob, State(state), Path(post.id)).await;
    assert!(matches!(result, Err(ApiError::NotLiked)));
}

#[test]
async fn test_like_missing_post_is_postnotfound() {
    let state = create_test_state();
    let bob = seed_user(&state, "bob").await;

    let result = handlers::like_post(bob, State(state), Path(Uuid::new_v4())).await;
    assert!(matches!(result, Err(ApiError::PostNotFound)));
}

// --- COMMENTS ---

#[test]
async fn test_comment_add_then_remove_restores_count() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let post = create_post(&state, &alice, "please discuss this in comments").await;

    let Json(commented) = handlers::add_comment(
        bob.clone(),
        State(state.clone()),
        Path(post.id),
        Json(comment_payload("a thoughtful reply to the post", &bob.name)),
    )
    .await
    .unwrap();
    assert_eq!(commented.comments.len(), 1);
    let comment_id = commented.comments[0].id;

    let Json(cleared) = handlers::remove_comment(
        bob,
        State(state),
        Path((post.id, comment_id)),
    )
    .await
    .unwrap();
    assert!(cleared.comments.is_empty());
}

#[test]
async fn test_comments_prepend_newest_first() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let post = create_post(&state, &alice, "a post with a busy thread").await;

    handlers::add_comment(
        bob.clone(),
        State(state.clone()),
        Path(post.id),
        Json(comment_payload("the earliest reply on the post", &bob.name)),
    )
    .await
    .unwrap();
    let Json(updated) = handlers::add_comment(
        bob.clone(),
        State(state.clone()),
        Path(post.id),
        Json(comment_payload("the latest reply on the post", &bob.name)),
    )
    .await
    .unwrap();

    assert_eq!(updated.comments.len(), 2);
    assert_eq!(updated.comments[0].text, "the latest reply on the post");
    assert_eq!(updated.comments[1].text, "the earliest reply on the post");
}

#[test]
async fn test_comment_validation_matches_post_validation() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let post = create_post(&state, &alice, "a post that attracts a bad comment").await;

    let result = handlers::add_comment(
        bob,
        State(state),
        Path(post.id),
        Json(comment_payload("", "bob")),
    )
    .await;

    match result {
        Err(ApiError::Validation(errors)) => {
            assert_eq!(
                errors.get("text").map(String::as_str),
                Some("Text field is required")
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
async fn test_remove_unknown_comment_is_commentnotexist() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let post = create_post(&state, &alice, "a post with zero comments").await;

    let result = handlers::remove_comment(
        alice,
        State(state),
        Path((post.id, Uuid::new_v4())),
    )
    .await;

    assert!(matches!(result, Err(ApiError::CommentNotFound)));
    let response = result.unwrap_err().into_response();
    assert_eq!(response.status(), 404);
}

#[test]
async fn test_comment_on_missing_post_is_postnotfound() {
    let state = create_test_state();
    let bob = seed_user(&state, "bob").await;

    let result = handlers::add_comment(
        bob,
        State(state),
        Path(Uuid::new_v4()),
        Json(comment_payload("a comment with nowhere to go", "bob")),
    )
    .await;

    assert!(matches!(result, Err(ApiError::PostNotFound)));
}

// --- USERS & PROFILES ---

#[test]
async fn test_current_user_reflects_seeded_record() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let Json(me) = handlers::current_user(alice.clone(), State(state))
        .await
        .unwrap();

    assert_eq!(me.id, alice.id);
    assert_eq!(me.email, "alice@example.com");
}

#[test]
async fn test_profile_missing_then_upserted() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    let result = handlers::get_my_profile(alice.clone(), State(state.clone())).await;
    assert!(matches!(result, Err(ApiError::NoProfile)));

    let Json(profile) = handlers::upsert_profile(
        alice.clone(),
        State(state.clone()),
        Json(ProfileRequest {
            handle: "alice-dev".to_string(),
            status: "Developer".to_string(),
            skills: "Rust,SQL".to_string(),
            ..ProfileRequest::default()
        }),
    )
    .await
    .unwrap();
    assert_eq!(profile.user, alice.id);
    assert_eq!(profile.skills, vec!["Rust", "SQL"]);

    let Json(found) = handlers::get_my_profile(alice, State(state)).await.unwrap();
    assert_eq!(found.id, profile.id);
}

#[test]
async fn test_handle_collision_between_users_is_rejected() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;

    let request = ProfileRequest {
        handle: "shared-handle".to_string(),
        status: "Developer".to_string(),
        skills: "Rust".to_string(),
        ..ProfileRequest::default()
    };

    handlers::upsert_profile(alice.clone(), State(state.clone()), Json(request.clone()))
        .await
        .unwrap();

    // Alice resubmitting her own handle is an ordinary update.
    handlers::upsert_profile(alice, State(state.clone()), Json(request.clone()))
        .await
        .unwrap();

    let result = handlers::upsert_profile(bob, State(state), Json(request)).await;
    match result {
        Err(ApiError::Validation(errors)) => {
            assert_eq!(
                errors.get("handle").map(String::as_str),
                Some("That handle already exists")
            );
        }
        other => panic!("expected handle collision, got {other:?}"),
    }
}

#[test]
async fn test_delete_account_removes_profile_and_user() {
    let state = create_test_state();
    let alice = seed_user(&state, "alice").await;

    handlers::upsert_profile(
        alice.clone(),
        State(state.clone()),
        Json(ProfileRequest {
            handle: "alice-dev".to_string(),
            status: "Developer".to_string(),
            skills: "Rust".to_string(),
            ..ProfileRequest::default()
        }),
    )
    .await
    .unwrap();

    let Json(body) = handlers::delete_account(alice.clone(), State(state.clone()))
        .await
        .unwrap();
    assert!(body.success);

    assert!(state.repo.find_profile(alice.id).await.unwrap().is_none());
    assert!(state.repo.find_user(alice.id).await.unwrap().is_none());
}
