use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::Markup;
use serde::Deserialize;

use crate::App;
use crate::error::AppError;
use crate::render::{self, PageContext};

const WEATHER_CATEGORY: &str = "Weather";

pub async fn page(State(app): State<App>) -> Result<Markup, AppError> {
    let ctx = PageContext::load(&app).await;
    let posts = app.store.list_posts(Some(WEATHER_CATEGORY)).await?;
    Ok(render::site::weather(&ctx, &posts, None))
}

#[derive(Deserialize)]
pub struct LookupForm {
    pub location: Option<String>,
}

/// A failed lookup renders the error view with a 500; it never takes the
/// process down with it.
pub async fn lookup(
    State(app): State<App>,
    Form(form): Form<LookupForm>,
) -> Result<Response, AppError> {
    let ctx = PageContext::load(&app).await;
    let location = form.location.unwrap_or_default();

    match app.weather.lookup(&location).await {
        Ok(reading) => {
            let posts = app.store.list_posts(Some(WEATHER_CATEGORY)).await?;
            Ok(render::site::weather(&ctx, &posts, Some(&reading)).into_response())
        }
        Err(e) => {
            tracing::warn!(error = %e, location = %location, "weather lookup failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                render::site::error_page(&ctx),
            )
                .into_response())
        }
    }
}
