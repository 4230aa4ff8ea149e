use axum::Form;
use axum::extract::{Multipart, Path, State};
use axum::response::Redirect;
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;

use crate::App;
use crate::error::AppError;
use crate::render::{self, PageContext};
use crate::session::AdminSession;
use crate::store::{NewPost, PostChanges, StoreError};
use crate::utils::{nonempty, slugify};
use crate::uploads;

const ADMIN_RECENT_LIMIT: i64 = 10;

pub async fn list(State(app): State<App>, _session: AdminSession) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    let posts = app.store.list_posts(None).await?;
    Ok(render::admin::posts(&ctx, &posts))
}

pub async fn recent(State(app): State<App>, _session: AdminSession) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    let posts = app.store.recent_posts(ADMIN_RECENT_LIMIT).await?;
    Ok(render::admin::recent_posts(&ctx, &posts))
}

pub async fn detail(
    State(app): State<App>,
    _session: AdminSession,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    match app.store.post_by_id(id).await? {
        Some(post) => Ok(render::admin::post_detail(&ctx, &post)),
        None => Err(AppError::NotFound("Post not found")),
    }
}

pub async fn compose_form(
    State(app): State<App>,
    AdminSession { admin, .. }: AdminSession,
) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::admin::compose(&ctx, &admin)
}

/// Creates a post from the multipart compose form. The slug is derived
/// from the title here, once; the body is run through the sanitizer before
/// it is stored.
pub async fn compose(
    State(app): State<App>,
    _session: AdminSession,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut title = None;
    let mut content = None;
    let mut tags = None;
    let mut category = None;
    let mut image: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed form data: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "title" => title = Some(read_text(field).await?),
            "content" => content = Some(read_text(field).await?),
            "tags" => tags = Some(read_text(field).await?),
            "category" => category = Some(read_text(field).await?),
            "image" => {
                let original = field.file_name().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("malformed form data: {e}")))?;
                if let Some(original) = original.filter(|n| !n.is_empty()) {
                    if !bytes.is_empty() {
                        image = Some((original, bytes.to_vec()));
                    }
                }
            }
            _ => {}
        }
    }

    let Some(title) = nonempty(title) else {
        return Err(AppError::Validation("Title is required".into()));
    };

    let stored_image = match image {
        Some((original, bytes)) => {
            Some(uploads::save_image(&app.config.upload_dir, &original, &bytes).await?)
        }
        None => None,
    };

    let now = Utc::now().naive_utc();
    let post = app
        .store
        .create_post(NewPost {
            link: slugify(&title),
            body: ammonia::clean(content.as_deref().unwrap_or_default()),
            title,
            image: stored_image,
            tags: tags.unwrap_or_default(),
            category: category.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(id = post.id, link = %post.link, "post published");
    Ok(Redirect::to("/"))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed form data: {e}")))
}

pub async fn edit_form(
    State(app): State<App>,
    _session: AdminSession,
    Path(id): Path<i32>,
) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    match app.store.post_by_id(id).await? {
        Some(post) => Ok(render::admin::edit_post(&ctx, &post)),
        None => Err(AppError::NotFound("Post not found")),
    }
}

#[derive(Deserialize)]
pub struct EditForm {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
}

/// Partial update: title, category and body only. Image, slug and tags
/// keep their creation-time values.
pub async fn edit(
    State(app): State<App>,
    _session: AdminSession,
    Path(id): Path<i32>,
    Form(form): Form<EditForm>,
) -> Result<Redirect, AppError> {
    let Some(title) = nonempty(form.title) else {
        return Err(AppError::Validation("Title is required".into()));
    };

    let changes = PostChanges {
        title,
        category: form.category.unwrap_or_default(),
        body: ammonia::clean(form.content.as_deref().unwrap_or_default()),
        updated_at: Utc::now().naive_utc(),
    };

    match app.store.update_post(id, changes).await {
        Ok(()) => Ok(Redirect::to("/admin/posts")),
        Err(StoreError::NotFound) => Err(AppError::NotFound("Post not found")),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    State(app): State<App>,
    _session: AdminSession,
    Path(id): Path<i32>,
) -> Result<Redirect, AppError> {
    app.store.delete_post(id).await?;
    tracing::info!(id, "post deleted");
    Ok(Redirect::to("/admin/posts"))
}
