use std::time::Duration;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;

use crate::App;
use crate::error::AppError;
use crate::render::{self, PageContext};
use crate::session::{AdminSession, COOKIE_NAME};
use crate::store::{NewAdmin, StoreError};
use crate::utils::nonempty;

/// Deliberate pause between destroying the session and redirecting.
const LOGOUT_REDIRECT_DELAY: Duration = Duration::from_secs(2);

pub async fn signup_form(State(app): State<App>) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::admin::signup(&ctx)
}

#[derive(Deserialize)]
pub struct SignupForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn signup(
    State(app): State<App>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let (Some(name), Some(email), Some(password)) = (
        nonempty(form.name),
        nonempty(form.email),
        nonempty(form.password),
    ) else {
        return Err(AppError::Validation(
            "Name, email and password are required".into(),
        ));
    };

    // bcrypt is CPU-bound; keep it off the async executor
    let password_hash = tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?
    .map_err(|e| AppError::Internal(e.to_string()))?;

    match app
        .store
        .create_admin(NewAdmin {
            name,
            email: email.to_lowercase(),
            password_hash,
            created_at: Utc::now().naive_utc(),
        })
        .await
    {
        Ok(admin) => {
            tracing::info!(email = %admin.email, "admin account created");
            Ok(Redirect::to("/signup-thankyou").into_response())
        }
        Err(StoreError::DuplicateKey(_)) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Oops! That email has already been used, please use another email",
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn login_form(State(app): State<App>) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::admin::login(&ctx, None)
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(app): State<App>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let credentials = match (nonempty(form.email), nonempty(form.password)) {
        (Some(email), Some(password)) => Some((email.to_lowercase(), password)),
        _ => None,
    };

    let admin = match &credentials {
        Some((email, _)) => app.store.admin_by_email(email).await?,
        None => None,
    };

    let verified = match (&admin, credentials) {
        (Some(admin), Some((_, password))) => {
            let hash = admin.password_hash.clone();
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
                .await
                .map_err(|e| AppError::Internal(e.to_string()))?
        }
        _ => false,
    };

    match admin.filter(|_| verified) {
        Some(admin) => {
            let token = app.sessions.create(admin.id);
            let cookie = Cookie::build((COOKIE_NAME, token)).http_only(true).path("/");
            Ok((jar.add(cookie), Redirect::to("/admin/dashboard")).into_response())
        }
        None => {
            let ctx = PageContext::load(&app).await;
            Ok(render::admin::login(&ctx, Some("Invalid email or password")).into_response())
        }
    }
}

pub async fn logout_confirm(State(app): State<App>, _session: AdminSession) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::admin::logout_confirm(&ctx)
}

pub async fn logout(
    State(app): State<App>,
    session: AdminSession,
    jar: CookieJar,
) -> impl IntoResponse {
    app.sessions.destroy(&session.token);
    tracing::info!(admin = %session.admin.email, "admin logged out");

    // the pause is intentional, see LOGOUT_REDIRECT_DELAY
    tokio::time::sleep(LOGOUT_REDIRECT_DELAY).await;

    let expired = Cookie::build((COOKIE_NAME, ""))
        .max_age(time::Duration::ZERO)
        .path("/");
    (jar.add(expired), Redirect::to("/"))
}
