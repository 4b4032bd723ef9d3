//! Attendance routes. All of them require the administrator session.
//!
//! - `POST /api/mark-present/{token}`: the check-in transition.
//! - `GET /api/attendance`, `GET /api/attendance-csv`: the records, as JSON
//!   or as a CSV download.
//! - `POST /api/add-attendance`: force-add a record, skipping the
//!   one-record-per-member guard.
//! - `PUT /api/update-attendance/{id}`, `DELETE /api/delete-attendance/{id}`:
//!   direct edits by record id. Deleting returns the member to `Invited`.

use actix_web::web::{delete, get, post, put, ServiceConfig};

mod list;
mod manage;
mod mark_present;

pub(super) fn routes(cfg: &mut ServiceConfig) {
    cfg.route("/mark-present/{token}", post().to(mark_present::process))
        .route("/attendance", get().to(list::json))
        .route("/attendance-csv", get().to(list::csv))
        .route("/add-attendance", post().to(manage::force_add))
        .route("/update-attendance/{id}", put().to(manage::update))
        .route("/delete-attendance/{id}", delete().to(manage::remove));
}
