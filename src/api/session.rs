//! Request-scoped session handle on top of `tower-sessions`

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, SessionManagerLayer, SessionStore,
};

use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
    models::user::SessionUser,
    AppState,
};

/// Key of the typed [`SessionData`] value inside the session record
pub const SESSION_DATA_KEY: &str = "data";

/// Everything remembered between two requests of the same browser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Logged-in user, `None` when anonymous
    #[serde(default)]
    pub user: Option<SessionUser>,
    /// One-shot messages for the next rendered page
    #[serde(default)]
    pub flashes: Vec<String>,
}

/// Cookie and expiry settings for the session middleware
pub fn layer<S: SessionStore + Clone>(store: S, config: &SessionConfig) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(config.cookie_name.clone())
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(config.ttl_seconds)))
}

/// The visitor's session data.
///
/// Changes stay in memory until [`Session::save`] hands them to the
/// middleware, which writes the record and sets the cookie once the
/// response is ready.
pub struct Session {
    inner: tower_sessions::Session,
    data: SessionData,
    dirty: bool,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let inner = tower_sessions::Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;
        Session::load(inner).await
    }
}

impl Session {
    /// Read the typed data out of the session.
    ///
    /// An unreachable store is an error, not an anonymous visit: a logged-in
    /// member must not be treated as logged out during an outage.
    pub async fn load(inner: tower_sessions::Session) -> AppResult<Self> {
        let data = inner
            .get::<SessionData>(SESSION_DATA_KEY)
            .await?
            .unwrap_or_default();

        Ok(Self {
            inner,
            data,
            dirty: false,
        })
    }

    /// Logged-in user, if any
    pub fn user(&self) -> Option<&SessionUser> {
        self.data.user.as_ref()
    }

    pub fn set_user(&mut self, user: SessionUser) {
        self.data.user = Some(user);
        self.dirty = true;
    }

    pub fn clear_user(&mut self) {
        self.data.user = None;
        self.dirty = true;
    }

    pub fn add_flash(&mut self, message: impl Into<String>) {
        self.data.flashes.push(message.into());
        self.dirty = true;
    }

    /// Drain the flash queue and return its first message
    pub fn take_flash(&mut self) -> Option<String> {
        if self.data.flashes.is_empty() {
            return None;
        }
        self.dirty = true;
        self.data.flashes.drain(..).next()
    }

    /// Move the session to a fresh id, e.g. when privileges change
    pub async fn cycle_id(&mut self) -> AppResult<()> {
        self.inner.cycle_id().await?;
        self.dirty = true;
        Ok(())
    }

    /// Hand pending changes to the session middleware.
    ///
    /// Without changes the record is left alone, so visitors who never
    /// log in or see a flash get no cookie.
    pub async fn save(self) -> AppResult<()> {
        if self.dirty {
            self.inner.insert(SESSION_DATA_KEY, &self.data).await?;
        }
        Ok(())
    }
}
