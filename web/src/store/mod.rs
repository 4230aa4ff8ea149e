//! Typed record stores for the four persisted collections (posts, admins,
//! contacts, subscribers) plus managed categories.
//!
//! The `Store` trait is the persistence seam: `PgStore` runs against
//! Postgres through diesel-async, `MemStore` keeps everything in process
//! and backs both the no-database mode and the test-suite. Uniqueness on
//! admin email, subscriber email and category name is enforced by the
//! store itself — callers may pre-check as a fast path but must treat
//! `DuplicateKey` as the source of truth.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;

pub mod memory;
pub mod postgres;

pub use memory::MemStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already holds this value. The payload names the field.
    #[error("duplicate {0}")]
    DuplicateKey(&'static str),

    #[error("record not found")]
    NotFound,

    #[error("datastore error: {0}")]
    Database(String),
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i32,
    pub title: String,
    /// Rich HTML, sanitized before it ever reaches the store.
    pub body: String,
    /// Stored filename under the upload directory, if an image was attached.
    pub image: Option<String>,
    /// Slug derived from the title at creation. Not unique.
    pub link: String,
    pub tags: String,
    pub category: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub link: String,
    pub tags: String,
    pub category: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// The edit path updates title, category and body only; image, link and
/// tags keep their creation-time values.
#[derive(AsChangeset, Debug)]
#[diesel(table_name = crate::schema::posts)]
pub struct PostChanges {
    pub title: String,
    pub category: String,
    pub body: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Admin {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::admins)]
pub struct NewAdmin {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Contact {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::contacts)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::subscribers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscriber {
    pub id: i32,
    /// Trimmed and lowercased before insert.
    pub email: String,
    pub name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::subscribers)]
pub struct NewSubscriber {
    pub email: String,
    pub name: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;

    /// All posts, oldest first. `category` is an exact-match filter.
    async fn list_posts(&self, category: Option<&str>) -> Result<Vec<Post>, StoreError>;

    /// The `limit` most recently created posts, newest first.
    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, StoreError>;

    async fn post_by_link(&self, link: &str) -> Result<Option<Post>, StoreError>;

    async fn post_by_id(&self, id: i32) -> Result<Option<Post>, StoreError>;

    /// Fails with `NotFound` when no post has this id.
    async fn update_post(&self, id: i32, changes: PostChanges) -> Result<(), StoreError>;

    /// Deleting a missing post is not an error.
    async fn delete_post(&self, id: i32) -> Result<(), StoreError>;

    /// Removes every post whose `category` field equals `category` exactly.
    /// Returns how many were removed.
    async fn delete_posts_by_category(&self, category: &str) -> Result<usize, StoreError>;

    async fn count_posts(&self) -> Result<i64, StoreError>;

    /// Distinct non-empty `category` values across posts, sorted.
    async fn distinct_categories(&self) -> Result<Vec<String>, StoreError>;

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, StoreError>;

    async fn admin_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError>;

    async fn admin_by_id(&self, id: i32) -> Result<Option<Admin>, StoreError>;

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError>;

    async fn subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, StoreError>;

    async fn create_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError>;

    async fn create_category(&self, category: NewCategory) -> Result<Category, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Removes the category record only; posts filed under it are the
    /// caller's concern.
    async fn delete_category(&self, name: &str) -> Result<(), StoreError>;
}
