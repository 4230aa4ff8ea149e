use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;

use crate::App;
use crate::error::AppError;
use crate::render::{self, PageContext};
use crate::store::NewContact;

pub async fn form(State(app): State<App>) -> Markup {
    let ctx = PageContext::load(&app).await;
    render::site::contact(&ctx)
}

#[derive(Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Persists the message, then kicks off the owner alert without waiting on
/// it: the redirect never depends on the mail relay.
pub async fn submit(
    State(app): State<App>,
    Form(form): Form<ContactForm>,
) -> Result<Redirect, AppError> {
    let name = form.name.unwrap_or_default();
    let email = form.email.unwrap_or_default();
    let message = form.message.unwrap_or_default();

    app.store
        .create_contact(NewContact {
            name: name.clone(),
            email: email.clone(),
            message: message.clone(),
            created_at: Utc::now().naive_utc(),
        })
        .await?;

    if let Some(to) = app.mailer.notify_to().map(str::to_owned) {
        let mailer = app.mailer.clone();
        let body = render::email::contact_alert(&name, &email, &message).into_string();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&to, "New Contact Form Message", &body).await {
                tracing::error!(error = %e, "failed to send contact alert");
            }
        });
    }

    Ok(Redirect::to("/thank-you"))
}
