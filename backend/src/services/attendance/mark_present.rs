use crate::error::CheckinError;
use crate::services::blocking;
use crate::session::AdminSession;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::Outcome;

/// Confirms a scanned token. Answers `400` when the member is already present.
pub(super) async fn process(
    state: web::Data<AppState>,
    session: AdminSession,
    token: web::Path<String>,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let manager = state.manager.clone();
    let token = token.into_inner();
    blocking(move || manager.check_in(identity, &token)).await?;
    Ok(HttpResponse::Ok().json(Outcome::ok_with("Marked present successfully")))
}
