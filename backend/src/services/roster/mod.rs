//! Roster routes: upload, listing, the public scan view and code images.
//!
//! - `POST /api/upload-csv`: multipart upload with the roster in a `csvFile`
//!   field. Every row is upserted with a newly issued token.
//! - `GET /api/members`: the full roster, tokens included.
//! - `GET /api/member/{token}`: what the scan page shows for a token. Public.
//! - `GET /api/generate-qr/{id}`: code image for a roster entry by id.
//! - `GET /api/generate-ticket-qr/{token}`: code image for a token. Public.
//! - `GET /api/qr-codes-csv`: the roster with each entry's scan URL, as CSV.

use actix_web::web::{get, post, ServiceConfig};

mod codes;
mod get;
mod upload;

pub(super) fn routes(cfg: &mut ServiceConfig) {
    cfg.route("/upload-csv", post().to(upload::process))
        .route("/members", get().to(get::members))
        .route("/member/{token}", get().to(get::member))
        .route("/generate-qr/{id}", get().to(codes::for_id))
        .route("/generate-ticket-qr/{token}", get().to(codes::for_token))
        .route("/qr-codes-csv", get().to(codes::roster_csv));
}
