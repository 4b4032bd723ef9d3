//! HTTP surface of the check-in service.
//!
//! Every route lives under `/api`. Handlers extract the caller's session,
//! hand the manager call to a blocking thread, and map the outcome to JSON;
//! failures become `{"success": false, "message": ...}` through
//! [`CheckinError`]'s `ResponseError` impl.

mod attendance;
mod auth;
mod roster;

use crate::error::CheckinError;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::{scope, Form, FormConfig, Json, JsonConfig};
use actix_web::{Either, HttpResponse, Scope};

const API_PATH: &str = "/api";
const BODY_LIMIT: usize = 1024 * 1024;

/// Request body sent either as JSON or as a urlencoded form.
pub(crate) type JsonOrForm<T> = Either<Json<T>, Form<T>>;

/// Configures and returns the Actix scope holding every API route.
///
/// Body extraction failures are answered with the same JSON outcome as every
/// other error.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .app_data(
            JsonConfig::default()
                .limit(BODY_LIMIT)
                .error_handler(|err, _req| invalid_body(err).into()),
        )
        .app_data(
            FormConfig::default()
                .limit(BODY_LIMIT)
                .error_handler(|err, _req| invalid_body(err).into()),
        )
        .configure(auth::routes)
        .configure(roster::routes)
        .configure(attendance::routes)
}

fn invalid_body(err: impl std::fmt::Display) -> CheckinError {
    CheckinError::Input(format!("Invalid request body: {err}"))
}

/// Runs store-bound work off the async executor.
pub(crate) async fn blocking<F, T>(work: F) -> Result<T, CheckinError>
where
    F: FnOnce() -> Result<T, CheckinError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CheckinError::Internal(format!("task join error: {e}")))?
}

/// A CSV body served as a download named `filename`.
pub(crate) fn csv_attachment(filename: &str, body: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename.to_string())],
        })
        .body(body)
}
