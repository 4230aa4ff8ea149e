//! Public-facing pages.

use maud::{Markup, PreEscaped, html};

use crate::openweather::WeatherReading;
use crate::store::Post;

use super::{PageContext, SITE_NAME, layout};

pub struct Pager {
    pub page: usize,
    pub pages: usize,
}

fn post_card(post: &Post) -> Markup {
    html! {
        article class="card" {
            h2 { a href={ "/posts/" (post.link) } { (post.title) } }
            p class="meta" {
                (post.created_at.format("%B %e, %Y"))
                @if !post.category.is_empty() {
                    " · " (post.category)
                }
            }
        }
    }
}

pub fn home(ctx: &PageContext, posts: &[Post], pager: Option<&Pager>) -> Markup {
    layout(
        "Home",
        ctx,
        html! {
            h1 { "Latest from " (SITE_NAME) }
            @if posts.is_empty() {
                p class="notice" { "Nothing published yet." }
            }
            @for post in posts {
                (post_card(post))
            }
            @if let Some(pager) = pager {
                nav class="pager" {
                    @if pager.page > 1 {
                        a href={ "/?page=" ((pager.page - 1)) } { "Previous" }
                    }
                    span { "Page " (pager.page) " of " (pager.pages) }
                    @if pager.page < pager.pages {
                        a href={ "/?page=" ((pager.page + 1)) } { "Next" }
                    }
                }
            }
        },
    )
}

pub fn about(ctx: &PageContext) -> Markup {
    layout(
        "About",
        ctx,
        html! {
            h1 { "About" }
            p {
                (SITE_NAME) " is a small journal of articles, weather notes and whatever "
                "else ends up published here. Use the contact page to reach the editor, "
                "or subscribe below to get new posts by email."
            }
        },
    )
}

pub fn post(ctx: &PageContext, post: &Post) -> Markup {
    layout(
        &post.title,
        ctx,
        html! {
            article {
                h1 { (post.title) }
                p class="meta" {
                    (post.created_at.format("%B %e, %Y"))
                    @if !post.category.is_empty() { " · " (post.category) }
                    @if !post.tags.is_empty() { " · " (post.tags) }
                }
                @if let Some(image) = &post.image {
                    img src={ "/uploads/" (image) } alt=(post.title);
                }
                // body is sanitized at write time
                div class="post-body" { (PreEscaped(post.body.as_str())) }
            }
        },
    )
}

pub fn weather(ctx: &PageContext, posts: &[Post], reading: Option<&WeatherReading>) -> Markup {
    layout(
        "Weather",
        ctx,
        html! {
            h1 { "Weather" }
            form class="stacked" method="post" action="/weather" {
                input type="text" name="location" placeholder="City, e.g. London";
                button type="submit" { "Look up" }
            }
            @if let Some(reading) = reading {
                section class="weather-reading" {
                    h2 { "Current conditions in " (reading.name) }
                    p {
                        (reading.description())
                        ", " (reading.main.temp) "°C (feels like " (reading.main.feels_like) "°C)"
                    }
                    p class="meta" {
                        "Humidity " (reading.main.humidity) "% · wind " (reading.wind.speed) " m/s"
                    }
                }
            }
            @if !posts.is_empty() {
                h2 { "Weather posts" }
                @for post in posts {
                    (post_card(post))
                }
            }
        },
    )
}

pub fn contact(ctx: &PageContext) -> Markup {
    layout(
        "Contact",
        ctx,
        html! {
            h1 { "Contact" }
            form class="stacked" method="post" action="/contact" {
                input type="text" name="name" placeholder="Your name";
                input type="email" name="email" placeholder="you@example.com";
                textarea name="message" rows="8" placeholder="Your message" {}
                button type="submit" { "Send" }
            }
        },
    )
}

pub fn thank_you(ctx: &PageContext) -> Markup {
    layout(
        "Thank you",
        ctx,
        html! {
            h1 { "Thank you" }
            p { "Your message is on its way. We'll get back to you soon." }
        },
    )
}

pub fn signup_thank_you(ctx: &PageContext) -> Markup {
    layout(
        "Account created",
        ctx,
        html! {
            h1 { "Account created" }
            p { "Your admin account is ready. " a href="/admin/login" { "Log in" } "." }
        },
    )
}

pub fn subscribe_thank_you(ctx: &PageContext) -> Markup {
    layout(
        "Thank you for subscribing",
        ctx,
        html! {
            h1 { "Thank you for subscribing" }
            p { "You're on the list — a confirmation email is on its way." }
        },
    )
}

/// Generic error view used when the weather lookup fails.
pub fn error_page(ctx: &PageContext) -> Markup {
    layout(
        "Something went wrong",
        ctx,
        html! {
            h1 { "Something went wrong" }
            p { "We couldn't complete that request. Please try again later." }
            p { a href="/" { "Back to the home page" } }
        },
    )
}
