use crate::error::CheckinError;
use crate::services::{blocking, JsonOrForm};
use crate::session::AdminSession;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{ForceAddRequest, UpdateAttendanceRequest};
use common::responses::Outcome;

pub(super) async fn force_add(
    state: web::Data<AppState>,
    session: AdminSession,
    payload: JsonOrForm<ForceAddRequest>,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let manager = state.manager.clone();
    let ForceAddRequest { member_id, fields } = payload.into_inner();
    blocking(move || manager.force_add_attendance(identity, member_id, fields)).await?;
    Ok(HttpResponse::Ok().json(Outcome::ok_with("Record added successfully")))
}

pub(super) async fn update(
    state: web::Data<AppState>,
    session: AdminSession,
    id: web::Path<String>,
    payload: JsonOrForm<UpdateAttendanceRequest>,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let manager = state.manager.clone();
    let id = id.into_inner();
    let fields = payload.into_inner();
    blocking(move || manager.update_attendance(identity, &id, &fields)).await?;
    Ok(HttpResponse::Ok().json(Outcome::ok_with("Record updated successfully")))
}

pub(super) async fn remove(
    state: web::Data<AppState>,
    session: AdminSession,
    id: web::Path<String>,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let manager = state.manager.clone();
    let id = id.into_inner();
    blocking(move || manager.delete_attendance(identity, &id)).await?;
    Ok(HttpResponse::Ok().json(Outcome::ok_with("Record deleted successfully")))
}
