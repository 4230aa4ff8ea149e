use axum::Router;
use axum::routing::{get, post};

use crate::App;

use super::{auth, categories, dashboard, posts};

pub fn router() -> Router<App> {
    Router::<App>::new()
        .route("/compose", get(posts::compose_form).post(posts::compose))
        .route("/admin/signup", get(auth::signup_form).post(auth::signup))
        .route("/admin/login", get(auth::login_form).post(auth::login))
        .route("/admin/logout", get(auth::logout_confirm).post(auth::logout))
        .route("/admin/dashboard", get(dashboard::dashboard))
        .route("/admin/categories", get(categories::list))
        .route("/admin/add-category", post(categories::add))
        .route("/admin/delete-category/{category}", post(categories::delete))
        .route("/admin/posts", get(posts::list))
        .route("/admin/edit-post/{id}", get(posts::edit_form).post(posts::edit))
        // deletion is state-changing, so it rides on POST rather than the
        // GET the old site used
        .route("/admin/delete-post/{id}", post(posts::delete))
        .route("/admin/recentPosts", get(posts::recent))
        .route("/admin/post/{id}", get(posts::detail))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use tower::ServiceExt;

    use crate::App;
    use crate::config::ServerConfig;
    use crate::store::{MemStore, NewPost, Store};

    fn harness() -> (Arc<MemStore>, Router) {
        let store = Arc::new(MemStore::new());
        let app = App::new(store.clone(), ServerConfig::for_tests());
        (store, crate::router(app))
    }

    async fn seed_post(store: &MemStore, title: &str, category: &str) -> i32 {
        let now = Utc::now().naive_utc();
        store
            .create_post(NewPost {
                title: title.to_string(),
                body: format!("<p>{title}</p>"),
                image: None,
                link: crate::utils::slugify(title),
                tags: String::new(),
                category: category.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
            .id
    }

    async fn body_string(res: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Signs up `a@x.com` and logs in, returning the session cookie.
    async fn login_cookie(router: &Router) -> String {
        let res = router
            .clone()
            .oneshot(form_post(
                "/admin/signup",
                "name=A&email=a%40x.com&password=p",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/signup-thankyou");

        let res = router
            .clone()
            .oneshot(form_post("/admin/login", "email=a%40x.com&password=p"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/admin/dashboard");

        res.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn admin_paths_redirect_anonymous_visitors_without_side_effects() {
        let (store, router) = harness();
        let id = seed_post(&store, "Keep Me", "General").await;

        for uri in [
            "/compose",
            "/admin/dashboard",
            "/admin/categories",
            "/admin/posts",
            "/admin/recentPosts",
            "/admin/logout",
        ] {
            let res = router
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(res.headers()[header::LOCATION], "/admin/login", "{uri}");
        }

        // the delete never ran
        let res = router
            .oneshot(
                Request::post(format!("/admin/delete-post/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/admin/login");
        assert!(store.post_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_signup_is_rejected_with_a_message() {
        let (_, router) = harness();

        let res = router
            .clone()
            .oneshot(form_post(
                "/admin/signup",
                "name=A&email=a%40x.com&password=p",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = router
            .oneshot(form_post(
                "/admin/signup",
                "name=B&email=a%40x.com&password=q",
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(res).await.contains("already been used"));
    }

    #[tokio::test]
    async fn wrong_password_rerenders_login_without_a_session() {
        let (_, router) = harness();
        let _ = login_cookie(&router).await;

        let res = router
            .oneshot(form_post("/admin/login", "email=a%40x.com&password=nope"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(header::SET_COOKIE).is_none());
        assert!(body_string(res).await.contains("Invalid email or password"));
    }

    #[tokio::test]
    async fn dashboard_counts_match_the_dataset() {
        let (store, router) = harness();
        seed_post(&store, "One", "News").await;
        seed_post(&store, "Two", "News").await;
        seed_post(&store, "Three", "Weather").await;

        let cookie = login_cookie(&router).await;
        let res = router
            .oneshot(
                Request::get("/admin/dashboard")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = body_string(res).await;
        assert!(body.contains(r#"id="total-posts">3<"#));
        assert!(body.contains(r#"id="total-categories">2<"#));
        assert!(body.contains(r#"id="total-recent-posts">3<"#));
    }

    #[tokio::test]
    async fn compose_derives_the_slug_and_sanitizes_the_body() {
        let (store, router) = harness();
        let cookie = login_cookie(&router).await;

        let boundary = "XBOUNDARYX";
        let mut body = String::new();
        for (name, value) in [
            ("title", "Hello, World!"),
            ("content", "<p>hi</p><script>alert(1)</script>"),
            ("tags", "greetings"),
            ("category", "General"),
        ] {
            body.push_str(&format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        let res = router
            .oneshot(
                Request::post("/compose")
                    .header(header::COOKIE, cookie)
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");

        let post = store.post_by_link("hello-world").await.unwrap().unwrap();
        assert_eq!(post.title, "Hello, World!");
        assert_eq!(post.tags, "greetings");
        assert_eq!(post.category, "General");
        assert!(post.body.contains("<p>hi</p>"));
        assert!(!post.body.contains("script"));
    }

    #[tokio::test]
    async fn edit_updates_only_title_category_and_body() {
        let (store, router) = harness();
        let id = seed_post(&store, "Original Title", "News").await;
        let cookie = login_cookie(&router).await;

        let res = router
            .oneshot(
                Request::post(format!("/admin/edit-post/{id}"))
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(
                        "title=Edited+Title&category=Weather&content=%3Cp%3Enew%3C%2Fp%3E",
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/admin/posts");

        let post = store.post_by_id(id).await.unwrap().unwrap();
        assert_eq!(post.title, "Edited Title");
        assert_eq!(post.category, "Weather");
        assert_eq!(post.body, "<p>new</p>");
        // slug still reflects the original title
        assert_eq!(post.link, "original-title");
    }

    #[tokio::test]
    async fn editing_a_missing_post_is_a_404() {
        let (_, router) = harness();
        let cookie = login_cookie(&router).await;

        let res = router
            .oneshot(
                Request::post("/admin/edit-post/999")
                    .header(header::COOKIE, cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("title=T&category=C&content=x"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_post_removes_the_record() {
        let (store, router) = harness();
        let id = seed_post(&store, "Doomed", "General").await;
        let cookie = login_cookie(&router).await;

        let res = router
            .oneshot(
                Request::post(format!("/admin/delete-post/{id}"))
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(store.post_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn categories_can_be_added_once_and_deleted_destructively() {
        let (store, router) = harness();
        seed_post(&store, "Forecast", "Weather").await;
        seed_post(&store, "Unrelated", "News").await;
        let cookie = login_cookie(&router).await;

        let res = router
            .clone()
            .oneshot(
                Request::post("/admin/add-category")
                    .header(header::COOKIE, &cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("category=Weather"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/admin/categories");

        let res = router
            .clone()
            .oneshot(
                Request::post("/admin/add-category")
                    .header(header::COOKIE, &cookie)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("category=Weather"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body_string(res).await.contains("Category already exists"));

        // deleting the category takes its posts with it, and only them
        let res = router
            .oneshot(
                Request::post("/admin/delete-category/Weather")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        assert!(store.list_categories().await.unwrap().is_empty());
        let remaining = store.list_posts(None).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].category, "News");
    }

    #[tokio::test]
    async fn admin_post_pages_render_for_a_logged_in_admin() {
        let (store, router) = harness();
        let id = seed_post(&store, "Readable", "General").await;
        let cookie = login_cookie(&router).await;

        for uri in [
            "/admin/posts".to_string(),
            "/admin/recentPosts".to_string(),
            format!("/admin/post/{id}"),
            format!("/admin/edit-post/{id}"),
            "/compose".to_string(),
            "/admin/categories".to_string(),
        ] {
            let res = router
                .clone()
                .oneshot(
                    Request::get(uri.as_str())
                        .header(header::COOKIE, &cookie)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn logout_destroys_the_session_after_the_delay() {
        let (_, router) = harness();
        let cookie = login_cookie(&router).await;

        let res = router
            .clone()
            .oneshot(
                Request::post("/admin/logout")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/");

        // the old cookie no longer opens the dashboard
        let res = router
            .oneshot(
                Request::get("/admin/dashboard")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/admin/login");
    }
}
