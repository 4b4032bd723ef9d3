use crate::error::CheckinError;
use crate::manager::Manager;
use crate::qr;
use crate::services::{blocking, csv_attachment};
use crate::session::AdminSession;
use crate::sheet;
use crate::state::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use common::responses::CodeImageResponse;

fn image_response(qr_image: String) -> HttpResponse {
    HttpResponse::Ok().json(CodeImageResponse {
        success: true,
        qr_image,
    })
}

/// Administrator re-issue of an entry's code, looked up by roster id.
pub(super) async fn for_id(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: AdminSession,
    id: web::Path<String>,
) -> Result<HttpResponse, CheckinError> {
    session.identity().require_admin()?;
    let base_url = state.base_url(&req);
    let manager = state.manager.clone();
    let id = id.into_inner();
    let image = blocking(move || {
        let entry = manager.resolve_by_id(&id)?;
        Ok(qr::data_url(&Manager::code_url_for(&entry, &base_url))?)
    })
    .await?;
    Ok(image_response(image))
}

/// Ticket image for whoever holds the token.
pub(super) async fn for_token(
    req: HttpRequest,
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> Result<HttpResponse, CheckinError> {
    let base_url = state.base_url(&req);
    let manager = state.manager.clone();
    let token = token.into_inner();
    let image = blocking(move || {
        let entry = manager.resolve_by_token(&token)?;
        Ok(qr::data_url(&Manager::code_url_for(&entry, &base_url))?)
    })
    .await?;
    Ok(image_response(image))
}

pub(super) async fn roster_csv(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: AdminSession,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let base_url = state.base_url(&req);
    let manager = state.manager.clone();
    let body = blocking(move || {
        let entries = manager.list_roster(identity)?;
        sheet::write_roster_codes(&entries, &base_url)
    })
    .await?;
    Ok(csv_attachment("qr_codes.csv", body))
}
