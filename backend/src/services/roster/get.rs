use crate::error::CheckinError;
use crate::services::blocking;
use crate::session::AdminSession;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::{MemberView, MembersResponse};

pub(super) async fn members(
    state: web::Data<AppState>,
    session: AdminSession,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let manager = state.manager.clone();
    let members = blocking(move || manager.list_roster(identity)).await?;
    Ok(HttpResponse::Ok().json(MembersResponse {
        success: true,
        members,
    }))
}

/// Scan view. No login needed; `isLoggedIn` tells the page whether to offer
/// the check-in button.
pub(super) async fn member(
    state: web::Data<AppState>,
    session: AdminSession,
    token: web::Path<String>,
) -> Result<HttpResponse, CheckinError> {
    let is_logged_in = session.identity().is_admin();
    let manager = state.manager.clone();
    let token = token.into_inner();
    let (member, status) = blocking(move || manager.member_view(&token)).await?;
    Ok(HttpResponse::Ok().json(MemberView {
        success: true,
        member,
        status: status.status,
        time: status.time,
        is_logged_in,
    }))
}
