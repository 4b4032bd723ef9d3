use crate::error::CheckinError;
use crate::services::{blocking, csv_attachment};
use crate::session::AdminSession;
use crate::sheet;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::responses::AttendanceResponse;

pub(super) async fn json(
    state: web::Data<AppState>,
    session: AdminSession,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let manager = state.manager.clone();
    let attendance = blocking(move || manager.list_attendance(identity)).await?;
    Ok(HttpResponse::Ok().json(AttendanceResponse {
        success: true,
        attendance,
    }))
}

pub(super) async fn csv(
    state: web::Data<AppState>,
    session: AdminSession,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    let manager = state.manager.clone();
    let body = blocking(move || {
        let records = manager.list_attendance(identity)?;
        sheet::write_attendance(&records)
    })
    .await?;
    Ok(csv_attachment("attendance.csv", body))
}
