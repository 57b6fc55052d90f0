//! Session cookie handling
//!
//! A session is the opaque token stored on the user row. Handlers that act on
//! behalf of a user take an [`AuthenticatedUser`], which only exists once the
//! `sessionId` cookie has been matched against the user repository.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "sessionId";

/// Session cookie settings
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl_days: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { ttl_days: 7 }
    }
}

impl SessionSettings {
    /// Build the cookie that hands `token` to the client
    pub fn cookie(&self, token: Uuid) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token.to_string()))
            .path("/")
            .http_only(true)
            .max_age(time::Duration::days(self.ttl_days))
            .build()
    }
}

/// The session token presented by the client, if it is well formed
pub fn presented_token(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// The user behind a valid session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = presented_token(&jar) else {
            debug!("Request without a usable session cookie");
            return Err(ApiError::Unauthenticated);
        };

        let user = state
            .user_repository
            .find_by_session(token)
            .await?
            .ok_or_else(|| {
                warn!("Session token matches no user");
                ApiError::Unauthenticated
            })?;

        Ok(AuthenticatedUser { id: user.id })
    }
}
