use axum::extract::{Path, Query, State};
use maud::Markup;
use serde::Deserialize;

use crate::App;
use crate::error::AppError;
use crate::render::site::Pager;
use crate::render::{self, PageContext};

const POSTS_PER_PAGE: usize = 10;

#[derive(Deserialize)]
pub struct HomeQuery {
    pub page: Option<usize>,
}

/// The home page lists every post by default; `?page=N` opts into
/// pagination without changing the default response shape.
pub async fn home(
    State(app): State<App>,
    Query(query): Query<HomeQuery>,
) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    let posts = app.store.list_posts(None).await?;

    match query.page {
        None => Ok(render::site::home(&ctx, &posts, None)),
        Some(page) => {
            let pages = posts.len().div_ceil(POSTS_PER_PAGE).max(1);
            let page = page.clamp(1, pages);
            let start = (page - 1) * POSTS_PER_PAGE;
            let end = (start + POSTS_PER_PAGE).min(posts.len());
            Ok(render::site::home(
                &ctx,
                &posts[start..end],
                Some(&Pager { page, pages }),
            ))
        }
    }
}

pub async fn about(State(app): State<App>) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::site::about(&ctx)
}

pub async fn post(
    State(app): State<App>,
    Path(link): Path<String>,
) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    match app.store.post_by_link(&link).await? {
        Some(post) => Ok(render::site::post(&ctx, &post)),
        None => Err(AppError::NotFound("Post not found")),
    }
}

pub async fn thank_you(State(app): State<App>) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::site::thank_you(&ctx)
}

pub async fn signup_thank_you(State(app): State<App>) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::site::signup_thank_you(&ctx)
}

pub async fn subscribe_thank_you(State(app): State<App>) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::site::subscribe_thank_you(&ctx)
}
