//! Administrator login and logout.
//!
//! - `POST /api/login`: compares the JSON or form credentials against configuration
//!   and marks the session as the administrator's.
//! - `POST /api/logout`: drops the session.
//! - `GET /api/session`: reports whether the caller is logged in.

use crate::error::CheckinError;
use crate::services::JsonOrForm;
use crate::session::AdminSession;
use crate::state::AppState;
use actix_web::web::{self, get, post, ServiceConfig};
use actix_web::HttpResponse;
use common::requests::LoginRequest;
use common::responses::{Outcome, SessionResponse};
use log::{info, warn};

pub(super) fn routes(cfg: &mut ServiceConfig) {
    cfg.route("/login", post().to(login))
        .route("/logout", post().to(logout))
        .route("/session", get().to(current));
}

async fn login(
    state: web::Data<AppState>,
    session: AdminSession,
    payload: JsonOrForm<LoginRequest>,
) -> Result<HttpResponse, CheckinError> {
    let payload = payload.into_inner();
    if !state.admin.matches(&payload.username, &payload.password) {
        warn!("rejected login for user '{}'", payload.username);
        return Err(CheckinError::Unauthorized("Invalid credentials".to_string()));
    }
    session.login()?;
    info!("administrator logged in");
    Ok(HttpResponse::Ok().json(Outcome::ok()))
}

async fn logout(session: AdminSession) -> HttpResponse {
    session.logout();
    HttpResponse::Ok().json(Outcome::ok())
}

async fn current(session: AdminSession) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        success: true,
        is_logged_in: session.identity().is_admin(),
    })
}
