use axum::Router;
use axum::routing::{get, post};

use crate::App;

use super::{contact, pages, subscribe, weather};

pub fn router() -> Router<App> {
    Router::<App>::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/posts/{link}", get(pages::post))
        .route("/weather", get(weather::page).post(weather::lookup))
        .route("/contact", get(contact::form).post(contact::submit))
        .route("/subscribe", post(subscribe::submit))
        .route("/thank-you", get(pages::thank_you))
        .route("/signup-thankyou", get(pages::signup_thank_you))
        .route(
            "/thank-you-for-subscribing",
            get(pages::subscribe_thank_you),
        )
}
