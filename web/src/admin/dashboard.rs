use axum::extract::State;
use maud::Markup;

use crate::App;
use crate::error::AppError;
use crate::render::{self, PageContext};
use crate::session::AdminSession;

/// How many posts count as "recent" on the dashboard card.
const DASHBOARD_RECENT_LIMIT: i64 = 5;

pub async fn dashboard(
    State(app): State<App>,
    AdminSession { admin, .. }: AdminSession,
) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;

    let total_posts = app.store.count_posts().await?;
    let total_categories = app.store.distinct_categories().await?.len();
    let total_recent_posts = app
        .store
        .recent_posts(DASHBOARD_RECENT_LIMIT)
        .await?
        .len();

    Ok(render::admin::dashboard(
        &ctx,
        &admin,
        total_posts,
        total_categories,
        total_recent_posts,
    ))
}
