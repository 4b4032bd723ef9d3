//! Error kinds surfaced by check-in operations and their HTTP mapping.

use crate::qr::QrError;
use crate::store::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::Outcome;
use log::error;

#[derive(Debug, thiserror::Error)]
pub enum CheckinError {
    /// A token or id matched nothing.
    #[error("{0}")]
    NotFound(String),
    /// The member already has an attendance record.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unauthorized(String),
    /// The upload could not be read as a roster.
    #[error("{0}")]
    Input(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Error generating QR code: {0}")]
    Render(#[from] QrError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckinError {
    pub fn unauthorized() -> Self {
        CheckinError::Unauthorized("Unauthorized".to_string())
    }

    /// Refusal of the scan page's check-in, which tells the desk to sign in.
    pub fn login_required() -> Self {
        CheckinError::Unauthorized("Unauthorized - Please login first".to_string())
    }

    pub fn member_not_found() -> Self {
        CheckinError::NotFound("Member not found".to_string())
    }
}

impl ResponseError for CheckinError {
    fn status_code(&self) -> StatusCode {
        match self {
            CheckinError::NotFound(_) => StatusCode::NOT_FOUND,
            CheckinError::Conflict(_) | CheckinError::Input(_) => StatusCode::BAD_REQUEST,
            CheckinError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CheckinError::Store(_) | CheckinError::Render(_) | CheckinError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {}", self);
        }
        HttpResponse::build(status).json(Outcome::failed(self.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CheckinError::member_not_found(), StatusCode::NOT_FOUND)]
    #[case(CheckinError::Conflict("Already marked present".into()), StatusCode::BAD_REQUEST)]
    #[case(CheckinError::unauthorized(), StatusCode::UNAUTHORIZED)]
    #[case(CheckinError::login_required(), StatusCode::UNAUTHORIZED)]
    #[case(CheckinError::Input("No file uploaded".into()), StatusCode::BAD_REQUEST)]
    #[case(CheckinError::Store(StoreError::Poisoned), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(CheckinError::Internal("join".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_kinds_to_status_codes(#[case] err: CheckinError, #[case] expected: StatusCode) {
        assert_eq!(err.status_code(), expected);
        assert_eq!(err.error_response().status(), expected);
    }

    #[test]
    fn message_is_the_display_text() {
        assert_eq!(CheckinError::member_not_found().to_string(), "Member not found");
        assert_eq!(
            CheckinError::Store(StoreError::Poisoned).to_string(),
            "database connection lock poisoned"
        );
    }
}
