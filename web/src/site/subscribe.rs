use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use chrono::Utc;
use serde::Deserialize;

use crate::App;
use crate::error::AppError;
use crate::render;
use crate::store::{NewSubscriber, StoreError};
use crate::utils::nonempty;

#[derive(Deserialize)]
pub struct SubscribeForm {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// The existence check is a fast path; the store's unique constraint is
/// what actually prevents duplicate subscribers under concurrent identical
/// requests. The thank-you email is sent synchronously: if it fails the
/// request fails even though the subscriber was already persisted.
pub async fn submit(
    State(app): State<App>,
    Form(form): Form<SubscribeForm>,
) -> Result<Redirect, AppError> {
    let (Some(email), Some(name)) = (nonempty(form.email), nonempty(form.name)) else {
        return Err(AppError::Validation("Email and name are required".into()));
    };

    let email = email.to_lowercase();

    if app.store.subscriber_by_email(&email).await?.is_some() {
        return Err(AppError::Duplicate("Email is already subscribed".into()));
    }

    let now = Utc::now().naive_utc();
    match app
        .store
        .create_subscriber(NewSubscriber {
            email: email.clone(),
            name: Some(name.clone()),
            created_at: now,
            updated_at: now,
        })
        .await
    {
        Ok(subscriber) => {
            tracing::info!(email = %subscriber.email, "new subscriber");
        }
        Err(StoreError::DuplicateKey(_)) => {
            // lost the race to an identical concurrent request
            return Err(AppError::Duplicate("Email is already subscribed".into()));
        }
        Err(e) => return Err(e.into()),
    }

    let body = render::email::subscriber_thank_you(&name).into_string();
    app.mailer
        .send(&email, "Thank You for Subscribing!", &body)
        .await?;

    Ok(Redirect::to("/thank-you-for-subscribing"))
}
