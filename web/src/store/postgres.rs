//! Postgres store over diesel-async with a deadpool connection pool.
//! Unique indexes on `admins.email`, `subscribers.email` and
//! `categories.name` are what actually enforce `DuplicateKey`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::schema::{admins, categories, contacts, posts, subscribers};

use super::{
    Admin, Category, Contact, NewAdmin, NewCategory, NewContact, NewPost, NewSubscriber, Post,
    PostChanges, Store, StoreError, Subscriber,
};

const MAX_POOL_SIZE: usize = 10;

pub struct PgStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgStore {
    /// Sets up the connection pool. Connections are established lazily, so
    /// this does not touch the network.
    pub fn connect(database_url: &str) -> Result<Self, StoreError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager)
            .max_size(MAX_POOL_SIZE)
            .build()
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(Self { pool })
    }
}

fn pool_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(e.to_string())
}

fn db_err(e: diesel::result::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Maps a unique-constraint violation on an insert to `DuplicateKey(key)`.
fn insert_err(e: diesel::result::Error, key: &'static str) -> StoreError {
    match e {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::DuplicateKey(key)
        }
        other => db_err(other),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(posts::table)
            .values(&post)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(db_err)
    }

    async fn list_posts(&self, category: Option<&str>) -> Result<Vec<Post>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        match category {
            Some(c) => {
                posts::table
                    .select(Post::as_select())
                    .filter(posts::category.eq(c))
                    .order(posts::id.asc())
                    .load(&mut conn)
                    .await
            }
            None => {
                posts::table
                    .select(Post::as_select())
                    .order(posts::id.asc())
                    .load(&mut conn)
                    .await
            }
        }
        .map_err(db_err)
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        posts::table
            .select(Post::as_select())
            .order((posts::created_at.desc(), posts::id.desc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(db_err)
    }

    async fn post_by_link(&self, link: &str) -> Result<Option<Post>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        posts::table
            .select(Post::as_select())
            .filter(posts::link.eq(link))
            .order(posts::id.asc())
            .first(&mut conn)
            .await
            .optional()
            .map_err(db_err)
    }

    async fn post_by_id(&self, id: i32) -> Result<Option<Post>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        posts::table
            .find(id)
            .select(Post::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(db_err)
    }

    async fn update_post(&self, id: i32, changes: PostChanges) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        let updated = diesel::update(posts::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(db_err)?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_post(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::delete(posts::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_posts_by_category(&self, category: &str) -> Result<usize, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::delete(posts::table.filter(posts::category.eq(category)))
            .execute(&mut conn)
            .await
            .map_err(db_err)
    }

    async fn count_posts(&self) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        posts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(db_err)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        posts::table
            .select(posts::category)
            .filter(posts::category.ne(""))
            .distinct()
            .order(posts::category.asc())
            .load(&mut conn)
            .await
            .map_err(db_err)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(admins::table)
            .values(&admin)
            .returning(Admin::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| insert_err(e, "email"))
    }

    async fn admin_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        admins::table
            .select(Admin::as_select())
            .filter(admins::email.eq(email))
            .first(&mut conn)
            .await
            .optional()
            .map_err(db_err)
    }

    async fn admin_by_id(&self, id: i32) -> Result<Option<Admin>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        admins::table
            .find(id)
            .select(Admin::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(db_err)
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(contacts::table)
            .values(&contact)
            .returning(Contact::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(db_err)
    }

    async fn subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        subscribers::table
            .select(Subscriber::as_select())
            .filter(subscribers::email.eq(email))
            .first(&mut conn)
            .await
            .optional()
            .map_err(db_err)
    }

    async fn create_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(subscribers::table)
            .values(&subscriber)
            .returning(Subscriber::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| insert_err(e, "email"))
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::insert_into(categories::table)
            .values(&category)
            .returning(Category::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|e| insert_err(e, "category"))
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        categories::table
            .select(Category::as_select())
            .order(categories::name.asc())
            .load(&mut conn)
            .await
            .map_err(db_err)
    }

    async fn delete_category(&self, name: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await.map_err(pool_err)?;
        diesel::delete(categories::table.filter(categories::name.eq(name)))
            .execute(&mut conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
