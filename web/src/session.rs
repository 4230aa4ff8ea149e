//! In-process admin sessions.
//!
//! A session is an opaque random token in a browser cookie mapped to the
//! admin's id. The map lives in process memory, so every session dies on
//! restart. Admin data is never cached in the session; the extractor loads
//! it fresh from the store on each request.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use base64::Engine;
use rand::Rng;

use crate::App;
use crate::store::{Admin, StoreError};

pub const COOKIE_NAME: &str = "session_token";

const TOKEN_PREFIX: &str = "lntn_";
const TOKEN_BYTES: usize = 48;

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<scc::HashMap<String, i32>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a token for a freshly authenticated admin.
    pub fn create(&self, admin_id: i32) -> String {
        let mut token_bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut token_bytes);

        let token = TOKEN_PREFIX.to_owned()
            + &base64::engine::general_purpose::STANDARD.encode(token_bytes);

        // 384 random bits; a collision would only evict an existing session
        let _ = self.inner.insert_sync(token.clone(), admin_id);
        token
    }

    pub fn admin_id(&self, token: &str) -> Option<i32> {
        self.inner.read_sync(token, |_, id| *id)
    }

    pub fn destroy(&self, token: &str) -> bool {
        self.inner.remove_sync(token).is_some()
    }
}

/// Extractor guarding every admin-scoped route. Rejection redirects to the
/// login page without running the handler.
pub struct AdminSession {
    pub admin: Admin,
    pub token: String,
}

pub enum AuthRejection {
    Unauthenticated,
    Store(StoreError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => Redirect::to("/admin/login").into_response(),
            AuthRejection::Store(e) => {
                tracing::error!(error = %e, "session admin lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

impl axum::extract::FromRequestParts<App> for AdminSession {
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(COOKIE_NAME)
            .ok_or(AuthRejection::Unauthenticated)?
            .value()
            .to_owned();

        let admin_id = state
            .sessions
            .admin_id(&token)
            .ok_or(AuthRejection::Unauthenticated)?;

        // a token whose admin has vanished behaves as logged out
        let admin = state
            .store
            .admin_by_id(admin_id)
            .await
            .map_err(AuthRejection::Store)?
            .ok_or(AuthRejection::Unauthenticated)?;

        Ok(AdminSession { admin, token })
    }
}
