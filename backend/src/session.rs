//! Cookie session carrying the administrator flag.
//!
//! Handlers never read the session directly: they extract an
//! [`AdminSession`] and pass its [`Identity`] to the manager, which makes the
//! admin gate an explicit argument of every guarded operation.

use crate::config::{Config, SESSION_KEY_MIN_LEN};
use crate::error::CheckinError;
use crate::manager::Identity;
use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::time::Duration;
use actix_web::cookie::Key;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use log::warn;

pub(crate) const ROLE_KEY: &str = "role";
const ADMIN_ROLE: &str = "admin";
const COOKIE_NAME: &str = "checkin_session";
const SESSION_TTL_HOURS: i64 = 24;

/// Wrapper over the actix session exposing only what check-in needs.
#[derive(Clone)]
pub struct AdminSession(Session);

impl AdminSession {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Who is calling. An unreadable session counts as anonymous.
    pub fn identity(&self) -> Identity {
        match self.0.get::<String>(ROLE_KEY) {
            Ok(Some(role)) if role == ADMIN_ROLE => Identity::Admin,
            Ok(_) => Identity::Anonymous,
            Err(err) => {
                warn!("unreadable session cookie: {err}");
                Identity::Anonymous
            }
        }
    }

    /// Marks this session as the administrator's, rotating the session id.
    pub fn login(&self) -> Result<(), CheckinError> {
        self.0.renew();
        self.0
            .insert(ROLE_KEY, ADMIN_ROLE)
            .map_err(|err| CheckinError::Internal(format!("failed to persist session: {err}")))
    }

    pub fn logout(&self) {
        self.0.purge();
    }
}

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(AdminSession::new) })
    }
}

/// Signing key from configuration, or a random one for this process.
pub fn session_key(config: &Config) -> Key {
    match &config.session_key {
        Some(bytes) if bytes.len() >= SESSION_KEY_MIN_LEN => Key::from(bytes.as_slice()),
        _ => Key::generate(),
    }
}

pub fn middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(COOKIE_NAME.to_string())
        .cookie_secure(cookie_secure)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build()
}

/// Name of the cookie set by [`middleware`].
pub fn cookie_name() -> &'static str {
    COOKIE_NAME
}
