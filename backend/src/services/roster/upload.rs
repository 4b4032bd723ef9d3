use crate::error::CheckinError;
use crate::services::blocking;
use crate::session::AdminSession;
use crate::sheet;
use crate::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::responses::ImportResponse;
use futures_util::StreamExt;
use log::info;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Multipart field carrying the roster file.
const UPLOAD_FIELD: &str = "csvFile";

/// Imports an uploaded roster.
///
/// The upload is spooled to a temporary file under the configured upload
/// directory. The file is removed once the import finishes, whether it
/// succeeded or not.
pub(super) async fn process(
    state: web::Data<AppState>,
    session: AdminSession,
    mut payload: Multipart,
) -> Result<HttpResponse, CheckinError> {
    let identity = session.identity();
    identity.require_admin()?;

    let upload = save_upload(&mut payload, &state.upload_dir)
        .await?
        .ok_or_else(|| CheckinError::Input("No file uploaded".to_string()))?;

    let manager = state.manager.clone();
    let count = blocking(move || {
        let rows = sheet::read_roster(BufReader::new(upload.as_file()))?;
        manager.import_roster(identity, rows)
    })
    .await?;

    info!("roster upload imported {count} rows");
    Ok(HttpResponse::Ok().json(ImportResponse {
        success: true,
        count,
    }))
}

fn upload_failed(err: impl std::fmt::Display) -> CheckinError {
    CheckinError::Input(format!("Error uploading file: {err}"))
}

/// Writes the `csvFile` field to a temporary file rewound to its start.
/// Other fields are read and discarded.
async fn save_upload(
    payload: &mut Multipart,
    dir: &Path,
) -> Result<Option<NamedTempFile>, CheckinError> {
    let mut upload = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(upload_failed)?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some(UPLOAD_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(upload_failed)?;
            }
            continue;
        }

        let mut file = Builder::new()
            .prefix("roster-")
            .suffix(".csv")
            .tempfile_in(dir)
            .map_err(upload_failed)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(upload_failed)?;
                writer.write_all(&chunk).map_err(upload_failed)?;
            }
            writer.flush().map_err(upload_failed)?;
        }
        file.as_file_mut().rewind().map_err(upload_failed)?;
        upload = Some(file);
    }

    Ok(upload)
}
