use axum::Form;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;

use crate::App;
use crate::error::AppError;
use crate::render::{self, PageContext};
use crate::session::AdminSession;
use crate::store::{NewCategory, StoreError};
use crate::utils::nonempty;

pub async fn list(State(app): State<App>, _session: AdminSession) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    let categories = app.store.list_categories().await?;
    Ok(render::admin::categories(&ctx, &categories, None))
}

#[derive(Deserialize)]
pub struct AddCategoryForm {
    pub category: Option<String>,
}

pub async fn add(
    State(app): State<App>,
    _session: AdminSession,
    Form(form): Form<AddCategoryForm>,
) -> Result<Response, AppError> {
    let Some(name) = nonempty(form.category) else {
        return Err(AppError::Validation("Category name is required".into()));
    };

    match app
        .store
        .create_category(NewCategory {
            name,
            created_at: Utc::now().naive_utc(),
        })
        .await
    {
        Ok(_) => Ok(Redirect::to("/admin/categories").into_response()),
        Err(StoreError::DuplicateKey(_)) => {
            let ctx = PageContext::load(&app).await;
            let categories = app.store.list_categories().await?;
            Ok(
                render::admin::categories(&ctx, &categories, Some("Category already exists"))
                    .into_response(),
            )
        }
        Err(e) => Err(e.into()),
    }
}

/// Destructive on purpose: removing a category also removes every post
/// whose category field matches it exactly.
pub async fn delete(
    State(app): State<App>,
    _session: AdminSession,
    Path(category): Path<String>,
) -> Result<Redirect, AppError> {
    let removed = app.store.delete_posts_by_category(&category).await?;
    app.store.delete_category(&category).await?;
    tracing::info!(category = %category, removed_posts = removed, "category deleted");
    Ok(Redirect::to("/admin/categories"))
}
