//! In-process store. Used when no `DATABASE_URL` is configured and by the
//! test-suite. Every conditional insert runs under the one mutex, so the
//! uniqueness guarantees hold under concurrent requests.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{
    Admin, Category, Contact, NewAdmin, NewCategory, NewContact, NewPost, NewSubscriber, Post,
    PostChanges, Store, StoreError, Subscriber,
};

#[derive(Default)]
struct Collections {
    posts: Vec<Post>,
    admins: Vec<Admin>,
    contacts: Vec<Contact>,
    subscribers: Vec<Subscriber>,
    categories: Vec<Category>,
    next_id: i32,
}

impl Collections {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Collections>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        // a poisoned lock only means a panic elsewhere; the data is still usable
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Contacts are write-only in the application; tests need to see them.
    #[cfg(test)]
    pub fn contacts(&self) -> Vec<Contact> {
        self.lock().contacts.clone()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut inner = self.lock();
        let post = Post {
            id: inner.next_id(),
            title: post.title,
            body: post.body,
            image: post.image,
            link: post.link,
            tags: post.tags,
            category: post.category,
            created_at: post.created_at,
            updated_at: post.updated_at,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn list_posts(&self, category: Option<&str>) -> Result<Vec<Post>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .posts
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect())
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .posts
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn post_by_link(&self, link: &str) -> Result<Option<Post>, StoreError> {
        let inner = self.lock();
        Ok(inner.posts.iter().find(|p| p.link == link).cloned())
    }

    async fn post_by_id(&self, id: i32) -> Result<Option<Post>, StoreError> {
        let inner = self.lock();
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update_post(&self, id: i32, changes: PostChanges) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;
        post.title = changes.title;
        post.category = changes.category;
        post.body = changes.body;
        post.updated_at = changes.updated_at;
        Ok(())
    }

    async fn delete_post(&self, id: i32) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.posts.retain(|p| p.id != id);
        Ok(())
    }

    async fn delete_posts_by_category(&self, category: &str) -> Result<usize, StoreError> {
        let mut inner = self.lock();
        let before = inner.posts.len();
        inner.posts.retain(|p| p.category != category);
        Ok(before - inner.posts.len())
    }

    async fn count_posts(&self) -> Result<i64, StoreError> {
        Ok(self.lock().posts.len() as i64)
    }

    async fn distinct_categories(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.lock();
        let set: BTreeSet<String> = inner
            .posts
            .iter()
            .filter(|p| !p.category.is_empty())
            .map(|p| p.category.clone())
            .collect();
        Ok(set.into_iter().collect())
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, StoreError> {
        let mut inner = self.lock();
        if inner.admins.iter().any(|a| a.email == admin.email) {
            return Err(StoreError::DuplicateKey("email"));
        }
        let admin = Admin {
            id: inner.next_id(),
            name: admin.name,
            email: admin.email,
            password_hash: admin.password_hash,
            created_at: admin.created_at,
        };
        inner.admins.push(admin.clone());
        Ok(admin)
    }

    async fn admin_by_email(&self, email: &str) -> Result<Option<Admin>, StoreError> {
        let inner = self.lock();
        Ok(inner.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn admin_by_id(&self, id: i32) -> Result<Option<Admin>, StoreError> {
        let inner = self.lock();
        Ok(inner.admins.iter().find(|a| a.id == id).cloned())
    }

    async fn create_contact(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let mut inner = self.lock();
        let contact = Contact {
            id: inner.next_id(),
            name: contact.name,
            email: contact.email,
            message: contact.message,
            created_at: contact.created_at,
        };
        inner.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn subscriber_by_email(&self, email: &str) -> Result<Option<Subscriber>, StoreError> {
        let inner = self.lock();
        Ok(inner.subscribers.iter().find(|s| s.email == email).cloned())
    }

    async fn create_subscriber(&self, subscriber: NewSubscriber) -> Result<Subscriber, StoreError> {
        let mut inner = self.lock();
        if inner.subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(StoreError::DuplicateKey("email"));
        }
        let subscriber = Subscriber {
            id: inner.next_id(),
            email: subscriber.email,
            name: subscriber.name,
            created_at: subscriber.created_at,
            updated_at: subscriber.updated_at,
        };
        inner.subscribers.push(subscriber.clone());
        Ok(subscriber)
    }

    async fn create_category(&self, category: NewCategory) -> Result<Category, StoreError> {
        let mut inner = self.lock();
        if inner.categories.iter().any(|c| c.name == category.name) {
            return Err(StoreError::DuplicateKey("category"));
        }
        let category = Category {
            id: inner.next_id(),
            name: category.name,
            created_at: category.created_at,
        };
        inner.categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn delete_category(&self, name: &str) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.categories.retain(|c| c.name != name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn new_post(title: &str, category: &str) -> NewPost {
        let now = Utc::now().naive_utc();
        NewPost {
            title: title.to_string(),
            body: format!("<p>{title}</p>"),
            image: None,
            link: crate::utils::slugify(title),
            tags: String::new(),
            category: category.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn new_admin(email: &str) -> NewAdmin {
        NewAdmin {
            name: "A".into(),
            email: email.into(),
            password_hash: "$2b$12$hash".into(),
            created_at: Utc::now().naive_utc(),
        }
    }

    fn new_subscriber(email: &str) -> NewSubscriber {
        let now = Utc::now().naive_utc();
        NewSubscriber {
            email: email.into(),
            name: Some("C".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn recent_posts_are_newest_first() {
        let store = MemStore::new();
        for title in ["one", "two", "three", "four", "five"] {
            store.create_post(new_post(title, "General")).await.unwrap();
        }

        let recent = store.recent_posts(4).await.unwrap();
        let titles: Vec<_> = recent.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["five", "four", "three", "two"]);
    }

    #[tokio::test]
    async fn posts_with_colliding_slugs_both_persist() {
        let store = MemStore::new();
        store
            .create_post(new_post("Hello World", "General"))
            .await
            .unwrap();
        store
            .create_post(new_post("hello, world", "General"))
            .await
            .unwrap();

        // slugs are not unique; both rows exist and lookup returns the first
        assert_eq!(store.count_posts().await.unwrap(), 2);
        let found = store.post_by_link("hello-world").await.unwrap().unwrap();
        assert_eq!(found.title, "Hello World");
    }

    #[tokio::test]
    async fn update_leaves_image_link_and_tags_untouched() {
        let store = MemStore::new();
        let mut post = new_post("Original", "General");
        post.image = Some("123-pic.png".into());
        post.tags = "a,b".into();
        let created = store.create_post(post).await.unwrap();

        store
            .update_post(
                created.id,
                PostChanges {
                    title: "Edited".into(),
                    category: "News".into(),
                    body: "<p>edited</p>".into(),
                    updated_at: Utc::now().naive_utc(),
                },
            )
            .await
            .unwrap();

        let edited = store.post_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(edited.title, "Edited");
        assert_eq!(edited.category, "News");
        assert_eq!(edited.body, "<p>edited</p>");
        assert_eq!(edited.image.as_deref(), Some("123-pic.png"));
        assert_eq!(edited.link, "original");
        assert_eq!(edited.tags, "a,b");
    }

    #[tokio::test]
    async fn update_missing_post_is_not_found() {
        let store = MemStore::new();
        let err = store
            .update_post(
                42,
                PostChanges {
                    title: "x".into(),
                    category: "x".into(),
                    body: "x".into(),
                    updated_at: Utc::now().naive_utc(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_by_category_matches_exactly() {
        let store = MemStore::new();
        store.create_post(new_post("a", "Weather")).await.unwrap();
        store.create_post(new_post("b", "Weather")).await.unwrap();
        store.create_post(new_post("c", "News")).await.unwrap();
        store
            .create_post(new_post("d", "Weathering"))
            .await
            .unwrap();

        let removed = store.delete_posts_by_category("Weather").await.unwrap();
        assert_eq!(removed, 2);

        let remaining: Vec<_> = store
            .list_posts(None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.category)
            .collect();
        assert_eq!(remaining, ["News", "Weathering"]);
    }

    #[tokio::test]
    async fn distinct_categories_skips_empty_and_dedupes() {
        let store = MemStore::new();
        store.create_post(new_post("a", "News")).await.unwrap();
        store.create_post(new_post("b", "News")).await.unwrap();
        store.create_post(new_post("c", "Weather")).await.unwrap();
        store.create_post(new_post("d", "")).await.unwrap();

        assert_eq!(
            store.distinct_categories().await.unwrap(),
            ["News", "Weather"]
        );
    }

    #[tokio::test]
    async fn duplicate_admin_email_is_rejected() {
        let store = MemStore::new();
        store.create_admin(new_admin("a@x.com")).await.unwrap();
        let err = store.create_admin(new_admin("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey("email")));
    }

    #[tokio::test]
    async fn duplicate_subscriber_email_is_rejected_atomically() {
        let store = std::sync::Arc::new(MemStore::new());

        // two identical subscribes racing: exactly one may win
        let (a, b) = tokio::join!(
            store.create_subscriber(new_subscriber("c@x.com")),
            store.create_subscriber(new_subscriber("c@x.com")),
        );
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        assert!(store.subscriber_by_email("c@x.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_category_is_rejected() {
        let store = MemStore::new();
        let now = Utc::now().naive_utc();
        store
            .create_category(NewCategory {
                name: "News".into(),
                created_at: now,
            })
            .await
            .unwrap();
        let err = store
            .create_category(NewCategory {
                name: "News".into(),
                created_at: now,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey("category")));

        store.delete_category("News").await.unwrap();
        assert!(store.list_categories().await.unwrap().is_empty());
    }
}
