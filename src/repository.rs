use crate::models::{Post, Profile, User};
use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers only ever
/// see this trait (`Arc<dyn Repository>`), so the post mutation logic can be
/// exercised against the in-memory implementation without a live database.
///
/// Post operations are plain document CRUD: the like/unlike/comment semantics
/// live on the [`Post`] model and handlers drive them as read-modify-write
/// cycles. The store is trusted to serialize concurrent writes to the same
/// row; no further consistency guarantee is made here.
///
/// **Send + Sync + async_trait** are required to make the trait object safely
/// shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: User) -> Result<User, sqlx::Error>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Profiles ---
    // Insert-or-update keyed on the owning user; the row id and creation date
    // survive an update.
    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, sqlx::Error>;
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error>;
    async fn find_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>, sqlx::Error>;
    async fn find_profiles(&self) -> Result<Vec<Profile>, sqlx::Error>;
    async fn delete_profile(&self, user_id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Posts (document CRUD) ---
    async fn create_post(&self, post: Post) -> Result<Post, sqlx::Error>;
    // All posts, date descending. No pagination, no filtering.
    async fn find_posts(&self) -> Result<Vec<Post>, sqlx::Error>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error>;
    // Writes the whole document back (text, likes, comments). Returns false
    // if the post vanished between read and write.
    async fn update_post(&self, post: &Post) -> Result<bool, sqlx::Error>;
    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The production implementation, backed by PostgreSQL. Posts keep their
/// embedded `likes`/`comments` sequences in JSONB columns so each post reads
/// and writes as a single document and row-level write serialization covers
/// the whole structure.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = "id, user_id, text, name, avatar, likes, comments, date";
const PROFILE_COLUMNS: &str =
    "id, user_id, handle, status, skills, company, website, location, bio, github_username, date";

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_user(&self, user: User) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password, avatar, date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, email, password, avatar, date",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.avatar)
        .bind(user.date)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, date FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, date FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert-or-update keyed on `user_id`. `EXCLUDED` carries the incoming
    /// row, so an update rewrites every profile field while the original row
    /// id and creation date stand.
    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles ({PROFILE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (user_id) DO UPDATE SET \
                 handle = EXCLUDED.handle, \
                 status = EXCLUDED.status, \
                 skills = EXCLUDED.skills, \
                 company = EXCLUDED.company, \
                 website = EXCLUDED.website, \
                 location = EXCLUDED.location, \
                 bio = EXCLUDED.bio, \
                 github_username = EXCLUDED.github_username \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile.id)
        .bind(profile.user)
        .bind(&profile.handle)
        .bind(&profile.status)
        .bind(Json(&profile.skills))
        .bind(&profile.company)
        .bind(&profile.website)
        .bind(&profile.location)
        .bind(&profile.bio)
        .bind(&profile.github_username)
        .bind(profile.date)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE handle = $1"
        ))
        .bind(handle)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_profiles(&self) -> Result<Vec<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn delete_profile(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_post(&self, post: Post) -> Result<Post, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts ({POST_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(post.id)
        .bind(post.user)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .bind(post.date)
        .fetch_one(&self.pool)
        .await
    }

    async fn find_posts(&self) -> Result<Vec<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY date DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        sqlx::query_as::<_, Post>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Writes the mutable parts of the document back in one statement. The
    /// single-row UPDATE is the atomicity boundary for concurrent likes on
    /// the same post.
    async fn update_post(&self, post: &Post) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE posts SET text = $2, likes = $3, comments = $4 WHERE id = $1")
                .bind(post.id)
                .bind(&post.text)
                .bind(Json(&post.likes))
                .bind(Json(&post.comments))
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// MemoryRepository
///
/// An in-memory implementation of [`Repository`] used by the test suites (and
/// handy for local experiments). Plain `RwLock`-guarded maps; locks are never
/// held across an await point.
#[derive(Default)]
pub struct MemoryRepository {
    users: RwLock<HashMap<Uuid, User>>,
    profiles: RwLock<HashMap<Uuid, Profile>>,
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn create_user(&self, user: User) -> Result<User, sqlx::Error> {
        self.users
            .write()
            .expect("users lock")
            .insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        Ok(self.users.read().expect("users lock").get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .read()
            .expect("users lock")
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(self.users.write().expect("users lock").remove(&id).is_some())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<Profile, sqlx::Error> {
        let mut profiles = self.profiles.write().expect("profiles lock");
        let stored = match profiles.get(&profile.user) {
            // Update path: the original row id and creation date stand.
            Some(existing) => Profile {
                id: existing.id,
                date: existing.date,
                ..profile
            },
            None => profile,
        };
        profiles.insert(stored.user, stored.clone());
        Ok(stored)
    }

    async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        Ok(self
            .profiles
            .read()
            .expect("profiles lock")
            .get(&user_id)
            .cloned())
    }

    async fn find_profile_by_handle(&self, handle: &str) -> Result<Option<Profile>, sqlx::Error> {
        Ok(self
            .profiles
            .read()
            .expect("profiles lock")
            .values()
            .find(|profile| profile.handle == handle)
            .cloned())
    }

    async fn find_profiles(&self) -> Result<Vec<Profile>, sqlx::Error> {
        let mut profiles: Vec<Profile> = self
            .profiles
            .read()
            .expect("profiles lock")
            .values()
            .cloned()
            .collect();
        profiles.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(profiles)
    }

    async fn delete_profile(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(self
            .profiles
            .write()
            .expect("profiles lock")
            .remove(&user_id)
            .is_some())
    }

    async fn create_post(&self, post: Post) -> Result<Post, sqlx::Error> {
        self.posts
            .write()
            .expect("posts lock")
            .insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_posts(&self) -> Result<Vec<Post>, sqlx::Error> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .expect("posts lock")
            .values()
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        Ok(self.posts.read().expect("posts lock").get(&id).cloned())
    }

    async fn update_post(&self, post: &Post) -> Result<bool, sqlx::Error> {
        let mut posts = self.posts.write().expect("posts lock");
        if !posts.contains_key(&post.id) {
            return Ok(false);
        }
        posts.insert(post.id, post.clone());
        Ok(true)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        Ok(self.posts.write().expect("posts lock").remove(&id).is_some())
    }
}
