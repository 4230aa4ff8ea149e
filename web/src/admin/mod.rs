//! Admin surface: signup/login/logout, the dashboard, and post/category
//! management. Every gated handler declares the `AdminSession` extractor;
//! without a valid session the request is redirected to the login page
//! before any data operation runs.

mod auth;
mod categories;
mod dashboard;
mod posts;

pub mod routes;
